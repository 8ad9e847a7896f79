//! Alias learning: the feedback loop that makes the matcher self-improving.
//!
//! The ONLY path that creates alias rows. Matching never writes aliases on
//! its own; a low-confidence automatic match must not reinforce itself.

use sqlx::SqlitePool;

use crate::database::{alias_repo, item_repo};
use crate::services::cache::ResultCache;
use crate::services::matcher::normalize::normalize_joined;
use crate::types::{AppError, AppResult};

const MIN_ALIAS_CHARS: usize = 2;

/// Persists a user-confirmed `raw_query` → item mapping and invalidates the
/// cache entries for that query.
///
/// Returns `Ok(true)` when the mapping now exists (including idempotent
/// re-learning and the redundant-alias no-op). Errors only on unusable
/// queries and unknown items.
pub async fn learn(
    pool: &SqlitePool,
    cache: &ResultCache,
    item_id: i64,
    raw_query: &str,
) -> AppResult<bool> {
    let alias = normalize_joined(raw_query);
    if alias.chars().count() < MIN_ALIAS_CHARS {
        return Err(AppError::Validation(format!(
            "Query '{raw_query}' too short to learn as alias"
        )));
    }

    let item = item_repo::get_item(pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {item_id}")))?;

    // Alias equal to the item's own normalized name adds nothing.
    if alias == item.normalized_name {
        log::debug!("Alias '{alias}' is the item's own name, skipping insert");
        cache.invalidate(Some(&alias));
        return Ok(true);
    }

    let inserted = alias_repo::insert_alias(pool, item_id, &alias).await?;
    if inserted {
        log::info!("Learned alias '{}' -> item #{} '{}'", alias, item.id, item.name);
    } else {
        log::debug!("Alias '{alias}' already known for item #{}", item.id);
    }

    cache.invalidate(Some(&alias));
    Ok(true)
}

#[cfg(test)]
#[path = "tests/feedback_tests.rs"]
mod tests;
