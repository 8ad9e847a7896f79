//! Query/name normalization for the matcher.
//!
//! Item names, aliases, incoming queries and cache keys all go through
//! the same canonical form: lowercase, separator
//! punctuation flattened to spaces, whitespace collapsed. Tokens of one or
//! two characters carry no signal for catalog text and are dropped.

/// Characters treated as separators in addition to whitespace. Vendor lists
/// write "CYKY-J 3x1,5 (m)" and "mat/prace" interchangeably.
const SEPARATORS: [char; 4] = [',', '/', '(', ')'];

const MIN_TOKEN_CHARS: usize = 3;

/// Canonical token sequence for `text`. Empty input (or input that is all
/// separators/short tokens) yields an empty vec, which callers read as
/// "no usable query".
pub fn normalize(text: &str) -> Vec<String> {
    flatten(text)
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Canonical joined form: lowercased, separators flattened, whitespace
/// collapsed to single spaces. Used for stored normalized names, cache keys
/// and whole-string similarity. Keeps short tokens: "3x1.5" fragments still
/// matter for string similarity even when too short to retrieve by.
pub fn normalize_joined(text: &str) -> String {
    flatten(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn flatten(text: &str) -> String {
    text.to_lowercase()
        .replace(SEPARATORS, " ")
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
