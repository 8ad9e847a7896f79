//! Request-level result cache for the matcher.
//!
//! Memoizes (normalized query, match type, threshold) → match outcome for a
//! bounded time window. Expired entries are treated as misses and evicted
//! lazily on lookup. Any catalog mutation invalidates either the affected
//! query's entries or the whole cache; correctness favors over-invalidation.
//!
//! Injected via `AppState`, never a module-level singleton, so tests can
//! construct a fresh instance per case.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::database::models::MatchType;
use crate::services::matcher::MatchOutcome;

pub const DEFAULT_TTL_SECS: u64 = 3600;
pub const DEFAULT_CAPACITY: usize = 4096;

/// Distinct thresholds are cached separately: the accept/reject outcome
/// depends on the threshold value. `f64::to_bits` keeps the key hashable;
/// callers pass thresholds as literals, so bit-identity is the right notion
/// of "same threshold".
#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    match_type: MatchType,
    threshold_bits: u64,
}

struct CachedEntry {
    outcome: Option<MatchOutcome>,
    cached_at: Instant,
}

pub struct ResultCache {
    entries: Mutex<LruCache<CacheKey, CachedEntry>>,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS), DEFAULT_CAPACITY)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Cache lookup. `None` is a miss; `Some(None)` is a cached
    /// "no match" outcome. Negatives are cached too: batch
    /// re-imports replay the same unmatched rows.
    pub fn get(
        &self,
        normalized_query: &str,
        match_type: MatchType,
        threshold: f64,
    ) -> Option<Option<MatchOutcome>> {
        let key = CacheKey {
            query: normalized_query.to_string(),
            match_type,
            threshold_bits: threshold.to_bits(),
        };

        let mut entries = self.entries.lock().unwrap();
        let expired = match entries.get(&key) {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => {
                return Some(entry.outcome.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            // Expired, evict lazily.
            entries.pop(&key);
        }
        None
    }

    pub fn put(
        &self,
        normalized_query: &str,
        match_type: MatchType,
        threshold: f64,
        outcome: Option<MatchOutcome>,
    ) {
        let key = CacheKey {
            query: normalized_query.to_string(),
            match_type,
            threshold_bits: threshold.to_bits(),
        };
        let entry = CachedEntry {
            outcome,
            cached_at: Instant::now(),
        };
        self.entries.lock().unwrap().put(key, entry);
    }

    /// Drops every entry for `query` (across all match types and
    /// thresholds), or everything when `query` is `None`.
    pub fn invalidate(&self, query: Option<&str>) {
        let mut entries = self.entries.lock().unwrap();
        match query {
            Some(query) => {
                let doomed: Vec<CacheKey> = entries
                    .iter()
                    .filter(|(key, _)| key.query == query)
                    .map(|(key, _)| key.clone())
                    .collect();
                for key in doomed {
                    entries.pop(&key);
                }
            }
            None => entries.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "tests/result_cache_tests.rs"]
mod tests;
