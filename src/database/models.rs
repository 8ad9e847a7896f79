use serde::{Deserialize, Serialize};

/// Provenance class of a price source. Gates which price field the source
/// may authoritatively supply (the "iron curtain" rule).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceClass {
    /// External vendor quote; authoritative for material price.
    Supplier,
    /// Internal budget history; authoritative for labor price.
    Internal,
    /// Manually entered; authoritative for either.
    Admin,
}

impl SourceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceClass::Supplier => "SUPPLIER",
            SourceClass::Internal => "INTERNAL",
            SourceClass::Admin => "ADMIN",
        }
    }
}

/// Which price the caller is matching for. Decides the eligible source
/// classes: material never reads internal budgets, labor never reads
/// supplier quotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Material,
    Labor,
}

impl MatchType {
    pub fn allowed_classes(&self) -> &'static [SourceClass] {
        match self {
            MatchType::Material => &[SourceClass::Supplier, SourceClass::Admin],
            MatchType::Labor => &[SourceClass::Internal, SourceClass::Admin],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Material => "material",
            MatchType::Labor => "labor",
        }
    }
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub normalized_name: String,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct SourceRow {
    pub id: i64,
    pub filename: String,
    pub vendor: Option<String>,
    pub date_offer: Option<String>,
    pub file_hash: Option<String>,
    pub offer_number: Option<String>,
    pub source_type: SourceClass,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct AliasRow {
    pub id: i64,
    pub item_id: i64,
    pub alias: String,
    pub created_at: String,
}

/// Alias row joined with its item's display name, for the admin listing.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct AliasListing {
    pub id: i64,
    pub item_id: i64,
    pub alias: String,
    pub item_name: String,
    pub created_at: String,
}

/// One observed price with its provenance, ordered by source date in
/// history listings.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct PriceHistoryPoint {
    pub date_offer: Option<String>,
    pub vendor: Option<String>,
    pub price_material: f64,
    pub price_labor: f64,
    pub unit: String,
}

/// Separator between individual aliases inside `Candidate::alias_blob`.
/// A unit separator keeps multi-word aliases reconstructable, which the
/// scorer needs for per-alias similarity.
pub const ALIAS_BLOB_SEPARATOR: char = '\u{1f}';

/// A retrieval candidate: one catalog item with its searchable alias text
/// and the latest eligible price. Explicit value type so the scorer has a
/// stable contract instead of dynamic rows.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub normalized_name: String,
    /// All aliases of the item joined with [`ALIAS_BLOB_SEPARATOR`];
    /// empty when none.
    pub alias_blob: String,
    pub price_material: f64,
    pub price_labor: f64,
    pub unit: String,
    pub vendor: Option<String>,
    pub date_offer: Option<String>,
    pub source_type: SourceClass,
}

impl Candidate {
    /// Iterates the individual aliases packed into `alias_blob`.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.alias_blob
            .split(ALIAS_BLOB_SEPARATOR)
            .filter(|alias| !alias.is_empty())
    }
}
