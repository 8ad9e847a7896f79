use sqlx::{SqliteConnection, SqlitePool};

use crate::database::models::PriceHistoryPoint;

pub async fn insert_price(
    conn: &mut SqliteConnection,
    item_id: i64,
    source_id: i64,
    price_material: f64,
    price_labor: f64,
    unit: &str,
    quantity: Option<f64>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO prices (item_id, source_id, price_material, price_labor, unit, quantity)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(item_id)
    .bind(source_id)
    .bind(price_material)
    .bind(price_labor)
    .bind(unit)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Full price history for an item, newest offer first.
pub async fn get_price_history(
    pool: &SqlitePool,
    item_id: i64,
) -> Result<Vec<PriceHistoryPoint>, sqlx::Error> {
    sqlx::query_as(
        "SELECT s.date_offer, s.vendor, p.price_material, p.price_labor, p.unit
         FROM prices p
         JOIN sources s ON s.id = p.source_id
         WHERE p.item_id = ?
         ORDER BY s.date_offer DESC, p.id DESC",
    )
    .bind(item_id)
    .fetch_all(pool)
    .await
}

pub async fn count_prices(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM prices")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
#[path = "tests/price_repo_test.rs"]
mod tests;
