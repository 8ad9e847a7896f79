//! Scoring primitives for the item matcher.
//!
//! Two scores per candidate:
//! 1. **Composite score** in [0,1], shown to callers and compared against
//!    the acceptance threshold. `0.8 × token overlap + 0.2 × best string
//!    similarity`.
//! 2. **Ranking score** (unbounded): `overlap count × 2 + whole-blob
//!    similarity`, used only to order candidates before the top-K cut.
//!    Raw overlap count rewards candidates that contain more of the query's
//!    words; the similarity term breaks ties between equal-overlap rows.

use strsim::normalized_levenshtein;

use crate::database::models::{Candidate, ALIAS_BLOB_SEPARATOR};

const TOKEN_OVERLAP_WEIGHT: f64 = 0.8;
const SIMILARITY_WEIGHT: f64 = 0.2;
const RANKING_OVERLAP_FACTOR: f64 = 2.0;

/// Both scores for one candidate, computed in a single pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    /// [0,1] score compared against the caller threshold.
    pub composite: f64,
    /// Ordering-only score; larger is better, not normalized.
    pub ranking: f64,
    /// How many query tokens the candidate's searchable text contains.
    pub overlap_count: usize,
}

/// Scores `candidate` against a query given as (`tokens`, `joined`), both
/// produced by [`super::normalize`]. Deterministic and side-effect-free.
pub fn score_candidate(tokens: &[String], joined: &str, candidate: &Candidate) -> CandidateScore {
    let searchable = searchable_text(candidate);

    let overlap_count = tokens
        .iter()
        .filter(|token| searchable.contains(token.as_str()))
        .count();
    let token_overlap = if tokens.is_empty() {
        0.0
    } else {
        overlap_count as f64 / tokens.len() as f64
    };

    // Similarity against the name and each alias separately; a learned
    // alias that equals the query must score 1.0 even when the item has
    // other aliases.
    let mut best_similarity = normalized_levenshtein(joined, &candidate.normalized_name);
    for alias in candidate.aliases() {
        best_similarity = best_similarity.max(normalized_levenshtein(joined, alias));
    }

    let composite = TOKEN_OVERLAP_WEIGHT * token_overlap + SIMILARITY_WEIGHT * best_similarity;
    let ranking = overlap_count as f64 * RANKING_OVERLAP_FACTOR
        + normalized_levenshtein(joined, &searchable);

    CandidateScore {
        composite,
        ranking,
        overlap_count,
    }
}

/// Normalized name plus all alias text, space-joined. The token-overlap and
/// whole-blob similarity both run over this.
pub fn searchable_text(candidate: &Candidate) -> String {
    if candidate.alias_blob.is_empty() {
        candidate.normalized_name.clone()
    } else {
        let aliases = candidate
            .alias_blob
            .replace(ALIAS_BLOB_SEPARATOR, " ");
        format!("{} {}", candidate.normalized_name, aliases)
    }
}

#[cfg(test)]
#[path = "tests/scoring_tests.rs"]
mod tests;
