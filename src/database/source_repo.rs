use sqlx::{SqliteConnection, SqlitePool};

use crate::database::models::{SourceClass, SourceRow};

/// How an existing source was recognised as a duplicate of the incoming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    FileHash,
    OfferNumber,
    Filename,
}

impl DuplicateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateKind::FileHash => "file_hash",
            DuplicateKind::OfferNumber => "offer_number",
            DuplicateKind::Filename => "filename",
        }
    }
}

/// Looks for an already-ingested source matching the incoming file by
/// content fingerprint, offer number, or filename (checked in that order).
pub async fn find_existing(
    pool: &SqlitePool,
    file_hash: &str,
    offer_number: Option<&str>,
    filename: &str,
) -> Result<Option<(SourceRow, DuplicateKind)>, sqlx::Error> {
    let by_hash: Option<SourceRow> = sqlx::query_as(
        "SELECT id, filename, vendor, date_offer, file_hash, offer_number, source_type
         FROM sources WHERE file_hash = ?",
    )
    .bind(file_hash)
    .fetch_optional(pool)
    .await?;
    if let Some(row) = by_hash {
        return Ok(Some((row, DuplicateKind::FileHash)));
    }

    if let Some(number) = offer_number {
        let by_number: Option<SourceRow> = sqlx::query_as(
            "SELECT id, filename, vendor, date_offer, file_hash, offer_number, source_type
             FROM sources WHERE offer_number = ?",
        )
        .bind(number)
        .fetch_optional(pool)
        .await?;
        if let Some(row) = by_number {
            return Ok(Some((row, DuplicateKind::OfferNumber)));
        }
    }

    let by_name: Option<SourceRow> = sqlx::query_as(
        "SELECT id, filename, vendor, date_offer, file_hash, offer_number, source_type
         FROM sources WHERE filename = ?",
    )
    .bind(filename)
    .fetch_optional(pool)
    .await?;
    Ok(by_name.map(|row| (row, DuplicateKind::Filename)))
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_source(
    conn: &mut SqliteConnection,
    filename: &str,
    vendor: Option<&str>,
    date_offer: Option<&str>,
    file_hash: Option<&str>,
    offer_number: Option<&str>,
    source_type: SourceClass,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO sources (filename, vendor, date_offer, file_hash, offer_number, source_type)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(filename)
    .bind(vendor)
    .bind(date_offer)
    .bind(file_hash)
    .bind(offer_number)
    .bind(source_type.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Removes a source and (via FK cascade) all its price rows.
pub async fn delete_source(pool: &SqlitePool, source_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sources WHERE id = ?")
        .bind(source_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Dedicated well-known source for admin-entered prices. Created on demand.
pub async fn get_or_create_admin_source(
    conn: &mut SqliteConnection,
    today: &str,
) -> Result<i64, sqlx::Error> {
    const ADMIN_FILENAME: &str = "__manual_entry__";

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM sources WHERE filename = ?")
        .bind(ADMIN_FILENAME)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    insert_source(
        conn,
        ADMIN_FILENAME,
        Some("Manual"),
        Some(today),
        None,
        None,
        SourceClass::Admin,
    )
    .await
}

#[cfg(test)]
#[path = "tests/source_repo_test.rs"]
mod tests;
