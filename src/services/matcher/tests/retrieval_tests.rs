use super::*;
use crate::database::alias_repo;
use crate::database::models::{Candidate, MatchType, SourceClass};
use crate::services::matcher::normalize::{normalize, normalize_joined};
use crate::test_utils::{init_test_db, seed_priced_item};

async fn retrieve_for(
    pool: &sqlx::SqlitePool,
    query: &str,
    match_type: MatchType,
) -> Vec<Candidate> {
    retrieve(
        pool,
        &normalize(query),
        &normalize_joined(query),
        match_type,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_retrieves_by_name_token() {
    let ctx = init_test_db().await;
    seed_priced_item(
        &ctx.pool,
        "offer1.pdf",
        SourceClass::Supplier,
        "Kabel CYKY-J 3x1.5",
        15.5,
        0.0,
        "m",
    )
    .await;

    let found = retrieve_for(&ctx.pool, "kabel cyky", MatchType::Material).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Kabel CYKY-J 3x1.5");
    assert_eq!(found[0].price_material, 15.5);
}

#[tokio::test]
async fn test_deduplicates_across_tokens() {
    let ctx = init_test_db().await;
    let (_, item_id) = seed_priced_item(
        &ctx.pool,
        "offer1.pdf",
        SourceClass::Supplier,
        "Kabel CYKY-J 3x1.5",
        15.5,
        0.0,
        "m",
    )
    .await;

    // Both tokens hit the same item; it must come back once.
    let found = retrieve_for(&ctx.pool, "kabel cyky", MatchType::Material).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, item_id);
}

#[tokio::test]
async fn test_retrieves_by_alias_token() {
    let ctx = init_test_db().await;
    let (_, item_id) = seed_priced_item(
        &ctx.pool,
        "offer1.pdf",
        SourceClass::Supplier,
        "Sádrokartonová deska bílá",
        100.0,
        0.0,
        "ks",
    )
    .await;
    alias_repo::insert_alias(&ctx.pool, item_id, "bílej papundekl")
        .await
        .unwrap();

    let found = retrieve_for(&ctx.pool, "papundekl", MatchType::Material).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, item_id);
    assert_eq!(found[0].alias_blob, "bílej papundekl");
}

#[tokio::test]
async fn test_iron_curtain_filters_supplier_from_labor() {
    let ctx = init_test_db().await;
    seed_priced_item(
        &ctx.pool,
        "supplier.pdf",
        SourceClass::Supplier,
        "Kabel CYKY-J 3x1.5",
        15.5,
        0.0,
        "m",
    )
    .await;

    let labor = retrieve_for(&ctx.pool, "kabel", MatchType::Labor).await;
    assert!(labor.is_empty(), "supplier-only item leaked into labor match");

    let material = retrieve_for(&ctx.pool, "kabel", MatchType::Material).await;
    assert_eq!(material.len(), 1);
}

#[tokio::test]
async fn test_admin_source_eligible_for_both_types() {
    let ctx = init_test_db().await;
    seed_priced_item(
        &ctx.pool,
        "manual.txt",
        SourceClass::Admin,
        "Montáž zásuvky",
        0.0,
        120.0,
        "ks",
    )
    .await;

    assert_eq!(
        retrieve_for(&ctx.pool, "montáž", MatchType::Labor).await.len(),
        1
    );
    assert_eq!(
        retrieve_for(&ctx.pool, "montáž", MatchType::Material)
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn test_short_token_query_falls_back_to_substring() {
    let ctx = init_test_db().await;
    seed_priced_item(
        &ctx.pool,
        "offer1.pdf",
        SourceClass::Supplier,
        "Trubka PVC",
        8.0,
        0.0,
        "m",
    )
    .await;

    // "pv" survives no tokenization but is a substring of the name.
    let found = retrieve_for(&ctx.pool, "pv", MatchType::Material).await;
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_empty_query_retrieves_nothing() {
    let ctx = init_test_db().await;
    seed_priced_item(
        &ctx.pool,
        "offer1.pdf",
        SourceClass::Supplier,
        "Trubka PVC",
        8.0,
        0.0,
        "m",
    )
    .await;

    let found = retrieve_for(&ctx.pool, "   ", MatchType::Material).await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_no_hit_is_empty_not_error() {
    let ctx = init_test_db().await;
    let found = retrieve_for(&ctx.pool, "neexistuje", MatchType::Material).await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_latest_eligible_price_wins() {
    let ctx = init_test_db().await;
    // Same item priced by two supplier offers with different dates.
    let (_, item_id) = seed_priced_item(
        &ctx.pool,
        "old_offer_2023-01-10.pdf",
        SourceClass::Supplier,
        "Kabel CYKY-J 3x1.5",
        12.0,
        0.0,
        "m",
    )
    .await;

    {
        use crate::database::{price_repo, source_repo};
        let mut tx = ctx.pool.begin().await.unwrap();
        let newer = source_repo::insert_source(
            &mut tx,
            "new_offer.pdf",
            Some("Vendor B"),
            Some("2025-02-01"),
            None,
            None,
            SourceClass::Supplier,
        )
        .await
        .unwrap();
        price_repo::insert_price(&mut tx, item_id, newer, 17.5, 0.0, "m", None)
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    let found = retrieve_for(&ctx.pool, "kabel", MatchType::Material).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].price_material, 17.5);
    assert_eq!(found[0].vendor.as_deref(), Some("Vendor B"));
}
