use sqlx::SqlitePool;

use crate::database::models::{AliasListing, AliasRow};

/// Inserts a learned alias. `INSERT OR IGNORE` keeps repeated feedback for
/// the same (item, alias) pair idempotent at the storage level.
pub async fn insert_alias(
    pool: &SqlitePool,
    item_id: i64,
    alias: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("INSERT OR IGNORE INTO item_aliases (item_id, alias) VALUES (?, ?)")
        .bind(item_id)
        .bind(alias)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_aliases_for_item(
    pool: &SqlitePool,
    item_id: i64,
) -> Result<Vec<AliasRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, item_id, alias, created_at FROM item_aliases WHERE item_id = ? ORDER BY id",
    )
    .bind(item_id)
    .fetch_all(pool)
    .await
}

/// Admin listing: every alias with the display name of its target item.
pub async fn list_all_aliases(pool: &SqlitePool) -> Result<Vec<AliasListing>, sqlx::Error> {
    sqlx::query_as(
        "SELECT a.id, a.item_id, a.alias, i.name AS item_name, a.created_at
         FROM item_aliases a
         JOIN items i ON i.id = a.item_id
         ORDER BY a.id",
    )
    .fetch_all(pool)
    .await
}

/// Bulk delete by alias id. Returns how many rows were removed.
pub async fn delete_aliases(pool: &SqlitePool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut qb: sqlx::QueryBuilder<sqlx::Sqlite> =
        sqlx::QueryBuilder::new("DELETE FROM item_aliases WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn count_aliases(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM item_aliases")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
#[path = "tests/alias_repo_test.rs"]
mod tests;
