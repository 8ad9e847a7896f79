//! Candidate retrieval: coarse token-containment search over item names and
//! learned aliases, bounded so one query never scans the whole catalog.

use sqlx::SqlitePool;

use crate::database::item_repo;
use crate::database::models::{Candidate, MatchType};
use crate::types::AppResult;

/// At most this many query tokens drive retrieval. Catalog descriptions are
/// front-loaded; later tokens are sizes and packaging noise.
const MAX_RETRIEVAL_TOKENS: usize = 5;

/// Per-token row cap passed down to the catalog query.
const PER_TOKEN_LIMIT: i64 = 50;

/// Fetches every item that could plausibly match the query, deduplicated by
/// item id, restricted to source classes eligible for `match_type`.
///
/// An empty result is a valid terminal state ("no match"), not an error.
pub async fn retrieve(
    pool: &SqlitePool,
    tokens: &[String],
    joined_query: &str,
    match_type: MatchType,
) -> AppResult<Vec<Candidate>> {
    let allowed = match_type.allowed_classes();

    if tokens.is_empty() {
        if joined_query.is_empty() {
            return Ok(Vec::new());
        }
        // No usable tokens (all short); fall back to a raw substring match.
        let rows = item_repo::find_candidates_by_substring(
            pool,
            joined_query,
            allowed,
            PER_TOKEN_LIMIT,
        )
        .await?;
        return Ok(rows);
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for token in tokens.iter().take(MAX_RETRIEVAL_TOKENS) {
        let rows =
            item_repo::find_candidates_by_token(pool, token, allowed, PER_TOKEN_LIMIT).await?;
        for row in rows {
            if candidates.iter().all(|c| c.id != row.id) {
                candidates.push(row);
            }
        }
    }

    log::debug!(
        "Retrieved {} candidate(s) for '{}' ({})",
        candidates.len(),
        joined_query,
        match_type.as_str()
    );
    Ok(candidates)
}

#[cfg(test)]
#[path = "tests/retrieval_tests.rs"]
mod tests;
