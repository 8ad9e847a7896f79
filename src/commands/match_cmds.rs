//! Match + feedback commands: the surface an HTTP layer (or spreadsheet
//! add-in bridge) calls into.

use std::collections::HashMap;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::database::models::MatchType;
use crate::services::matcher::{self, MatchOutcome};
use crate::types::AppResult;
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    /// Free-text item descriptions, typically pasted from a bill of
    /// quantities.
    pub items: Vec<String>,
    pub match_type: MatchType,
    /// Acceptance threshold; falls back to the configured default.
    pub threshold: Option<f64>,
}

/// Batch match. Every input query gets an entry in the response map;
/// `None` means "no confident match". Queries are independent, so they
/// run concurrently, and one unmatched query never
/// affects the rest. A catalog failure aborts the whole batch.
pub async fn match_items(
    state: &AppState,
    request: MatchRequest,
) -> AppResult<HashMap<String, Option<MatchOutcome>>> {
    let threshold = request.threshold.unwrap_or(state.config.default_threshold);
    log::info!(
        "Matching {} item(s), type {}, threshold {}",
        request.items.len(),
        request.match_type.as_str(),
        threshold
    );

    let lookups = request.items.iter().map(|query| async {
        let outcome = matcher::find_best_match_cached(
            &state.pool,
            &state.cache,
            query,
            request.match_type,
            threshold,
        )
        .await?;
        Ok::<_, crate::types::AppError>((query.clone(), outcome))
    });

    let mut results = HashMap::with_capacity(request.items.len());
    for resolved in join_all(lookups).await {
        let (query, outcome) = resolved?;
        results.insert(query, outcome);
    }
    Ok(results)
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearnRequest {
    pub query: String,
    pub item_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearnResponse {
    pub success: bool,
}

/// User-confirmed mapping feedback. Rejected (as an error) for unusable
/// queries and unknown items; otherwise idempotent.
pub async fn learn_feedback(state: &AppState, request: LearnRequest) -> AppResult<LearnResponse> {
    let success = matcher::feedback::learn(
        &state.pool,
        &state.cache,
        request.item_id,
        &request.query,
    )
    .await?;
    Ok(LearnResponse { success })
}

#[cfg(test)]
#[path = "tests/match_cmds_tests.rs"]
mod tests;
