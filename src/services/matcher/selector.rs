//! Ranks scored candidates and applies the acceptance threshold.

use crate::database::models::Candidate;
use crate::services::matcher::scoring::{score_candidate, CandidateScore};

/// How many runner-up alternatives ride along with an accepted match.
pub const MAX_ALTERNATIVES: usize = 4;

#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub score: CandidateScore,
}

/// Scores all candidates and orders them best-first.
///
/// Ordering is by internal ranking score descending; ties break on lower
/// item id so repeated runs over the same catalog are reproducible.
pub fn rank_candidates(
    tokens: &[String],
    joined_query: &str,
    candidates: Vec<Candidate>,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = score_candidate(tokens, joined_query, &candidate);
            RankedCandidate { candidate, score }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .ranking
            .partial_cmp(&a.score.ranking)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });
    ranked
}

/// Splits the ranked list into (best, alternatives) if the best candidate's
/// composite score clears `threshold`. Below-threshold lists yield `None`
/// wholesale; alternatives are only surfaced alongside an accepted match.
pub fn select_best(
    ranked: Vec<RankedCandidate>,
    threshold: f64,
) -> Option<(RankedCandidate, Vec<RankedCandidate>)> {
    let mut iter = ranked.into_iter();
    let best = iter.next()?;
    if best.score.composite < threshold {
        return None;
    }
    let alternatives: Vec<RankedCandidate> = iter.take(MAX_ALTERNATIVES).collect();
    Some((best, alternatives))
}

#[cfg(test)]
#[path = "tests/selector_tests.rs"]
mod tests;
