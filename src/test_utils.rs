use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Once;

static INIT: Once = Once::new();

pub struct TestContext {
    pub pool: Pool<Sqlite>,
}

pub async fn init_test_db() -> TestContext {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });

    // In-memory database per test; single connection avoids locking issues
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    TestContext { pool }
}

/// Inserts a source + one item + one price in a single transaction and
/// returns (source_id, item_id). Shared fixture for repo and matcher tests.
pub async fn seed_priced_item(
    pool: &Pool<Sqlite>,
    filename: &str,
    source_type: crate::database::models::SourceClass,
    item_name: &str,
    price_material: f64,
    price_labor: f64,
    unit: &str,
) -> (i64, i64) {
    use crate::database::{item_repo, price_repo, source_repo};
    use crate::services::matcher::normalize::normalize_joined;

    let mut tx = pool.begin().await.expect("begin tx");
    let source_id = source_repo::insert_source(
        &mut tx,
        filename,
        Some("Test Vendor"),
        Some("2024-05-01"),
        None,
        None,
        source_type,
    )
    .await
    .expect("insert source");

    let item_id =
        item_repo::insert_item_if_absent(&mut tx, item_name, &normalize_joined(item_name))
            .await
            .expect("insert item");

    price_repo::insert_price(
        &mut tx,
        item_id,
        source_id,
        price_material,
        price_labor,
        unit,
        Some(1.0),
    )
    .await
    .expect("insert price");

    tx.commit().await.expect("commit tx");
    (source_id, item_id)
}
