//! Item-matching engine, the core of the price catalog.
//!
//! Given a free-text description ("Kabel CYKY-J 3x1,5" pasted from a bill of
//! quantities), finds the catalog item it most likely refers to:
//!
//! 1. Normalize the query into tokens ([`normalize`]).
//! 2. Retrieve bounded candidates by token containment over names and
//!    learned aliases, filtered by eligible source classes ([`retrieval`]).
//! 3. Score each candidate ([`scoring`]), rank, and apply the caller's
//!    acceptance threshold ([`selector`]).
//!
//! Results are memoized per (query, match type, threshold) in the injected
//! [`ResultCache`]; user-confirmed mappings feed back in via [`feedback`].

pub mod feedback;
pub mod normalize;
pub mod retrieval;
pub mod scoring;
pub mod selector;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::database::models::{MatchType, SourceClass};
use crate::services::cache::ResultCache;
use crate::types::AppResult;
use selector::RankedCandidate;

/// Default acceptance threshold. Low on purpose: catalog queries are domain
/// specific enough that loose matches are usually right, and callers tune it
/// per call site anyway.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// A runner-up candidate surfaced alongside an accepted match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alternative {
    pub item_id: i64,
    pub item_name: String,
    pub score: f64,
}

/// An accepted match for one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchOutcome {
    pub item_id: i64,
    pub item_name: String,
    /// Composite score ∈ [0,1]; always ≥ the threshold it was accepted at.
    pub score: f64,
    pub price_material: f64,
    pub price_labor: f64,
    pub unit: String,
    pub vendor: Option<String>,
    pub date_offer: Option<String>,
    pub source_type: SourceClass,
    pub alternatives: Vec<Alternative>,
}

/// One full pass of the engine for a single query. `Ok(None)` covers both
/// "no candidates" and "best candidate below threshold"; callers see a
/// single "no match" outcome.
pub async fn find_best_match(
    pool: &SqlitePool,
    query: &str,
    match_type: MatchType,
    threshold: f64,
) -> AppResult<Option<MatchOutcome>> {
    let tokens = normalize::normalize(query);
    let joined = normalize::normalize_joined(query);
    if tokens.is_empty() && joined.is_empty() {
        return Ok(None);
    }

    let candidates = retrieval::retrieve(pool, &tokens, &joined, match_type).await?;
    if candidates.is_empty() {
        log::debug!("No candidates for '{query}'");
        return Ok(None);
    }

    let ranked = selector::rank_candidates(&tokens, &joined, candidates);

    #[cfg(feature = "debug_matcher")]
    for entry in &ranked {
        log::debug!(
            "  candidate #{} '{}' ranking={:.3} composite={:.3}",
            entry.candidate.id,
            entry.candidate.name,
            entry.score.ranking,
            entry.score.composite
        );
    }

    match selector::select_best(ranked, threshold) {
        Some((best, alternatives)) => {
            log::info!(
                "Matched '{}' -> '{}' (score {:.2})",
                query,
                best.candidate.name,
                best.score.composite
            );
            Ok(Some(build_outcome(best, alternatives)))
        }
        None => {
            log::debug!("Best candidate for '{query}' below threshold {threshold}");
            Ok(None)
        }
    }
}

/// Cache-aware wrapper around [`find_best_match`]. Negative outcomes are
/// cached too; re-imports of the same bill of quantities hit the same
/// unmatched rows over and over.
pub async fn find_best_match_cached(
    pool: &SqlitePool,
    cache: &ResultCache,
    query: &str,
    match_type: MatchType,
    threshold: f64,
) -> AppResult<Option<MatchOutcome>> {
    let key_query = normalize::normalize_joined(query);
    if let Some(hit) = cache.get(&key_query, match_type, threshold) {
        log::debug!("Cache hit for '{key_query}'");
        return Ok(hit);
    }

    let outcome = find_best_match(pool, query, match_type, threshold).await?;
    cache.put(&key_query, match_type, threshold, outcome.clone());
    Ok(outcome)
}

fn build_outcome(best: RankedCandidate, alternatives: Vec<RankedCandidate>) -> MatchOutcome {
    let alternatives = alternatives
        .into_iter()
        .map(|entry| Alternative {
            item_id: entry.candidate.id,
            item_name: entry.candidate.name,
            score: entry.score.composite,
        })
        .collect();

    MatchOutcome {
        item_id: best.candidate.id,
        item_name: best.candidate.name,
        score: best.score.composite,
        price_material: best.candidate.price_material,
        price_labor: best.candidate.price_labor,
        unit: best.candidate.unit,
        vendor: best.candidate.vendor,
        date_offer: best.candidate.date_offer,
        source_type: best.candidate.source_type,
        alternatives,
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
