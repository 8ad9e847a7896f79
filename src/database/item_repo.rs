use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::database::models::{Candidate, ItemRow, SourceClass};

/// Inserts the item unless an entry with the same display name already
/// exists; either way returns the canonical item id. Runs on a connection so
/// callers can keep "item + price" inserts in one transaction.
pub async fn insert_item_if_absent(
    conn: &mut SqliteConnection,
    name: &str,
    normalized_name: &str,
) -> Result<i64, sqlx::Error> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM items WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO items (name, normalized_name) VALUES (?, ?)")
        .bind(name)
        .bind(normalized_name)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn item_exists(pool: &SqlitePool, item_id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM items WHERE id = ?")
        .bind(item_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn get_item(pool: &SqlitePool, item_id: i64) -> Result<Option<ItemRow>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, normalized_name FROM items WHERE id = ?")
        .bind(item_id)
        .fetch_optional(pool)
        .await
}

/// Admin rename. Re-normalizes so future matching sees the new name.
pub async fn rename_item(
    pool: &SqlitePool,
    item_id: i64,
    new_name: &str,
    new_normalized: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE items SET name = ?, normalized_name = ? WHERE id = ?")
        .bind(new_name)
        .bind(new_normalized)
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Lightweight name search for the admin/search surface (no prices joined).
pub async fn search_items_by_name(
    pool: &SqlitePool,
    needle: &str,
    limit: i64,
) -> Result<Vec<ItemRow>, sqlx::Error> {
    let pattern = like_pattern(&needle.trim().to_lowercase());
    sqlx::query_as(
        "SELECT id, name, normalized_name FROM items
         WHERE normalized_name LIKE ? ESCAPE '\\' ORDER BY id LIMIT ?",
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn count_items(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(pool)
        .await
}

/// Candidate query for the matcher: items whose normalized name OR any alias
/// contains `token`, joined with the latest price from an eligible source
/// class. One row per item.
pub async fn find_candidates_by_token(
    pool: &SqlitePool,
    token: &str,
    allowed: &[SourceClass],
    limit: i64,
) -> Result<Vec<Candidate>, sqlx::Error> {
    let pattern = like_pattern(token);
    let mut qb = candidate_query_base(allowed);
    qb.push(" AND (i.normalized_name LIKE ");
    qb.push_bind(pattern.clone());
    qb.push(" ESCAPE '\\' OR EXISTS (SELECT 1 FROM item_aliases al WHERE al.item_id = i.id AND al.alias LIKE ");
    qb.push_bind(pattern);
    qb.push(" ESCAPE '\\'))");
    qb.push(" LIMIT ");
    qb.push_bind(limit);

    qb.build_query_as::<Candidate>().fetch_all(pool).await
}

/// Fallback when the query yields no usable tokens: plain substring match of
/// the whole normalized query against item names.
pub async fn find_candidates_by_substring(
    pool: &SqlitePool,
    normalized_query: &str,
    allowed: &[SourceClass],
    limit: i64,
) -> Result<Vec<Candidate>, sqlx::Error> {
    let pattern = like_pattern(normalized_query);
    let mut qb = candidate_query_base(allowed);
    qb.push(" AND i.normalized_name LIKE ");
    qb.push_bind(pattern);
    qb.push(" ESCAPE '\\' LIMIT ");
    qb.push_bind(limit);

    qb.build_query_as::<Candidate>().fetch_all(pool).await
}

/// Shared SELECT for candidate queries. Picks, per item, the single price
/// row from the newest eligible source (date desc, then price id desc so a
/// re-ingested source wins).
fn candidate_query_base(allowed: &[SourceClass]) -> QueryBuilder<'static, Sqlite> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT
            i.id,
            i.name,
            i.normalized_name,
            COALESCE((SELECT GROUP_CONCAT(a.alias, char(31)) FROM item_aliases a WHERE a.item_id = i.id), '') AS alias_blob,
            p.price_material,
            p.price_labor,
            p.unit,
            s.vendor,
            s.date_offer,
            s.source_type
        FROM items i
        JOIN prices p ON p.item_id = i.id
        JOIN sources s ON s.id = p.source_id
        WHERE p.id = (
            SELECT p2.id
            FROM prices p2
            JOIN sources s2 ON s2.id = p2.source_id
            WHERE p2.item_id = i.id AND s2.source_type IN ("#,
    );
    push_class_list(&mut qb, allowed);
    qb.push(
        r#")
            ORDER BY s2.date_offer DESC, p2.id DESC
            LIMIT 1
        )
        AND s.source_type IN ("#,
    );
    push_class_list(&mut qb, allowed);
    qb.push(")");
    qb
}

/// LIKE pattern that matches `needle` as a literal substring. `%`, `_` and
/// the escape character itself are escaped; every query using this pairs it
/// with `ESCAPE '\'`.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn push_class_list(qb: &mut QueryBuilder<'_, Sqlite>, allowed: &[SourceClass]) {
    let mut separated = qb.separated(", ");
    for class in allowed {
        separated.push_bind(class.as_str());
    }
}

#[cfg(test)]
#[path = "tests/item_repo_test.rs"]
mod tests;
