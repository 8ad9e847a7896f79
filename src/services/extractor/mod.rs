//! External text-extraction boundary.
//!
//! Turning a quote PDF or budget spreadsheet into structured line items is
//! not this crate's problem; an external service does it. This module owns
//! only the trait seam and a JSON-over-HTTP client for it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::database::models::SourceClass;
use crate::types::{AppError, AppResult};

/// One line item as returned by the extraction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub raw_name: String,
    #[serde(default)]
    pub price_material: f64,
    #[serde(default)]
    pub price_labor: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub quantity: Option<f64>,
}

fn default_unit() -> String {
    "ks".to_string()
}

/// Structured result of extracting one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub vendor: Option<String>,
    /// Offer date as `YYYY-MM-DD` when the service could find one.
    pub date: Option<String>,
    pub offer_number: Option<String>,
    #[serde(default)]
    pub items: Vec<ExtractedItem>,
}

/// The extraction collaborator. Receives raw document text plus a
/// provenance hint (supplier quote vs. internal budget) and returns
/// structured items, or fails as a unit.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(
        &self,
        text: &str,
        document_name: &str,
        kind: SourceClass,
    ) -> AppResult<ExtractedDocument>;
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
    document_name: &'a str,
    document_kind: &'a str,
}

/// JSON-over-HTTP implementation against the configured extraction endpoint.
pub struct HttpExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpExtractor {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl TextExtractor for HttpExtractor {
    async fn extract(
        &self,
        text: &str,
        document_name: &str,
        kind: SourceClass,
    ) -> AppResult<ExtractedDocument> {
        let body = ExtractRequest {
            text,
            document_name,
            document_kind: kind.as_str(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Extraction(format!(
                "extractor returned {} for '{document_name}'",
                response.status()
            )));
        }

        response
            .json::<ExtractedDocument>()
            .await
            .map_err(|e| AppError::Extraction(format!("invalid extractor response: {e}")))
    }
}

/// Canned-response extractor for tests and offline runs.
pub struct StaticExtractor {
    pub document: ExtractedDocument,
}

#[async_trait]
impl TextExtractor for StaticExtractor {
    async fn extract(
        &self,
        _text: &str,
        _document_name: &str,
        _kind: SourceClass,
    ) -> AppResult<ExtractedDocument> {
        Ok(self.document.clone())
    }
}
