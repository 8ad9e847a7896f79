//! Environment-driven configuration. A `.env` file is honored when present.

use crate::services::cache::DEFAULT_TTL_SECS;
use crate::services::matcher::DEFAULT_THRESHOLD;

const DEFAULT_DATABASE_URL: &str = "sqlite://pricebook.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Endpoint of the external text-extraction service.
    pub extractor_url: Option<String>,
    pub extractor_api_key: Option<String>,
    pub cache_ttl_secs: u64,
    /// Threshold used when a match request does not supply one.
    pub default_threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            extractor_url: None,
            extractor_api_key: None,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            default_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or(defaults.database_url),
            extractor_url: std::env::var("EXTRACTOR_URL").ok(),
            extractor_api_key: std::env::var("EXTRACTOR_API_KEY").ok(),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            default_threshold: std::env::var("MATCH_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_threshold),
        }
    }
}
