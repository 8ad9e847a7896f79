//! Catalog ingestion: files in, price records out.
//!
//! Pipeline per file: fingerprint → classify provenance → extract line
//! items (external service) → duplicate check → transactional upsert of
//! source + items + prices → cache reset. The actual document decoding
//! lives behind [`TextExtractor`]; this module never parses PDFs or
//! spreadsheets itself.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::models::SourceClass;
use crate::database::{item_repo, price_repo, source_repo};
use crate::services::cache::ResultCache;
use crate::services::extractor::TextExtractor;
use crate::services::matcher::normalize::normalize_joined;
use crate::types::{AppError, AppResult};

/// Extensions the batch importer will pick up.
const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "txt", "csv", "xlsx", "xls"];

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    Success {
        source_id: i64,
        source_type: SourceClass,
        items_count: usize,
    },
    /// The file (or its offer) is already in the catalog.
    Duplicate {
        existing_filename: String,
        matched_by: &'static str,
    },
    /// The extraction service found no line items.
    Skipped,
}

/// Ingests one file into the catalog.
pub async fn ingest_file(
    pool: &SqlitePool,
    cache: &ResultCache,
    extractor: &dyn TextExtractor,
    path: &Path,
    kind_override: Option<SourceClass>,
) -> AppResult<IngestOutcome> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::Validation(format!("Bad file path: {}", path.display())))?
        .to_string();

    let bytes = std::fs::read(path)?;
    let file_hash = blake3::hash(&bytes).to_hex().to_string();
    let source_type = kind_override.unwrap_or_else(|| classify_path(path));

    // Binary formats pass through as-is; decoding is the extractor's job.
    let text = String::from_utf8_lossy(&bytes);
    let document = extractor.extract(&text, &filename, source_type).await?;

    let mut items = document.items;
    if items.is_empty() {
        log::warn!("Extractor returned no items for '{filename}'");
        return Ok(IngestOutcome::Skipped);
    }

    if let Some((existing, matched_by)) = source_repo::find_existing(
        pool,
        &file_hash,
        document.offer_number.as_deref(),
        &filename,
    )
    .await?
    {
        log::info!(
            "Skipping '{}': duplicate of '{}' (matched by {})",
            filename,
            existing.filename,
            matched_by.as_str()
        );
        return Ok(IngestOutcome::Duplicate {
            existing_filename: existing.filename,
            matched_by: matched_by.as_str(),
        });
    }

    // Iron-curtain hygiene at write time: internal budget files must never
    // contribute material prices.
    if source_type == SourceClass::Internal {
        for item in &mut items {
            item.price_material = 0.0;
        }
    }

    let date_offer = determine_date(document.date.as_deref(), path);

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let source_id = source_repo::insert_source(
        &mut tx,
        &filename,
        document.vendor.as_deref(),
        Some(&date_offer),
        Some(&file_hash),
        document.offer_number.as_deref(),
        source_type,
    )
    .await?;

    let mut stored = 0usize;
    for item in &items {
        let name = item.raw_name.trim();
        if name.is_empty() {
            continue;
        }
        let item_id =
            item_repo::insert_item_if_absent(&mut tx, name, &normalize_joined(name)).await?;
        price_repo::insert_price(
            &mut tx,
            item_id,
            source_id,
            item.price_material,
            item.price_labor,
            &item.unit,
            item.quantity,
        )
        .await?;
        stored += 1;
    }
    tx.commit().await.map_err(AppError::from)?;

    // Bulk mutation: every cached result may now be stale.
    cache.invalidate(None);

    log::info!(
        "Ingested '{}' as {} source #{} ({} item(s), offer date {})",
        filename,
        source_type.as_str(),
        source_id,
        stored,
        date_offer
    );
    Ok(IngestOutcome::Success {
        source_id,
        source_type,
        items_count: stored,
    })
}

/// Walks `dir` and ingests every supported file, collecting per-file
/// outcomes. One bad file does not stop the run.
pub async fn ingest_dir(
    pool: &SqlitePool,
    cache: &ResultCache,
    extractor: &dyn TextExtractor,
    dir: &Path,
) -> AppResult<Vec<(String, AppResult<IngestOutcome>)>> {
    let mut outcomes = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if !supported {
            continue;
        }

        let result = ingest_file(pool, cache, extractor, path, None).await;
        if let Err(e) = &result {
            log::warn!("Failed to ingest '{}': {}", path.display(), e);
        }
        outcomes.push((path.display().to_string(), result));
    }
    Ok(outcomes)
}

/// Admin-entered item + price, attributed to the well-known manual source
/// (class ADMIN, eligible for both match types). Name collisions resolve to
/// the existing item; only the new price row is added then.
pub async fn add_manual_item(
    pool: &SqlitePool,
    cache: &ResultCache,
    name: &str,
    price_material: f64,
    price_labor: f64,
    unit: &str,
) -> AppResult<i64> {
    let name = name.trim();
    let normalized = normalize_joined(name);
    if normalized.is_empty() {
        return Err(AppError::Validation("Item name must not be empty".into()));
    }

    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let source_id = source_repo::get_or_create_admin_source(&mut tx, &today).await?;
    let item_id = item_repo::insert_item_if_absent(&mut tx, name, &normalized).await?;
    price_repo::insert_price(
        &mut tx,
        item_id,
        source_id,
        price_material,
        price_labor,
        unit,
        None,
    )
    .await?;
    tx.commit().await.map_err(AppError::from)?;

    // Single-item mutation: only this name's cached results can be stale.
    cache.invalidate(Some(&normalized));
    log::info!("Added manual item #{item_id} '{name}'");
    Ok(item_id)
}

/// Wipes the whole catalog (items, prices, sources, learned aliases) and
/// clears the cache. Alias rows go too: they reference item ids that stop
/// existing.
pub async fn reset_catalog(pool: &SqlitePool, cache: &ResultCache) -> AppResult<()> {
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    sqlx::query("DELETE FROM prices").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM item_aliases")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM items").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM sources").execute(&mut *tx).await?;
    tx.commit().await.map_err(AppError::from)?;

    cache.invalidate(None);
    log::warn!("Catalog reset: all items, prices, sources and aliases deleted");
    Ok(())
}

/// Provenance classification when the caller gives no override: files from
/// internal-history folders are budget data, everything else is a supplier
/// quote.
pub fn classify_path(path: &Path) -> SourceClass {
    let haystack = path.to_string_lossy().to_lowercase();
    if haystack.contains("internal") || haystack.contains("02_historie") {
        SourceClass::Internal
    } else {
        SourceClass::Supplier
    }
}

/// Offer-date fallback chain: extractor date → date in the filename
/// (`YYYY-MM-DD` or `DD.MM.YYYY`) → file modification time.
pub fn determine_date(extracted: Option<&str>, path: &Path) -> String {
    if let Some(raw) = extracted {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if let Some(m) = iso_date_regex().find(&filename) {
        if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    if let Some(caps) = dotted_date_regex().captures(&filename) {
        let rebuilt = format!("{}-{:0>2}-{:0>2}", &caps[3], &caps[2], &caps[1]);
        if let Ok(date) = NaiveDate::parse_from_str(&rebuilt, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    let mtime = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|time| DateTime::<Local>::from(time).date_naive())
        .unwrap_or_else(|_| Local::now().date_naive());
    mtime.format("%Y-%m-%d").to_string()
}

fn iso_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"20\d{2}-\d{2}-\d{2}").unwrap())
}

fn dotted_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(20\d{2})").unwrap())
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
