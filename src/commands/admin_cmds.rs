//! Admin commands: alias management, manual catalog entry, status.

use serde::{Deserialize, Serialize};

use crate::database::models::{AliasListing, ItemRow, PriceHistoryPoint};
use crate::database::{alias_repo, item_repo, price_repo};
use crate::services::catalog;
use crate::types::AppResult;
use crate::AppState;

/// Read-only listing of every learned alias with its target item name.
pub async fn list_aliases(state: &AppState) -> AppResult<Vec<AliasListing>> {
    Ok(alias_repo::list_all_aliases(&state.pool).await?)
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAliasesResponse {
    pub deleted_count: u64,
}

/// Bulk alias deletion. Any deletion invalidates the whole cache: a match
/// that relied solely on a removed alias must revert immediately.
pub async fn delete_aliases(state: &AppState, ids: Vec<i64>) -> AppResult<DeleteAliasesResponse> {
    let deleted_count = alias_repo::delete_aliases(&state.pool, &ids).await?;
    if deleted_count > 0 {
        state.cache.invalidate(None);
        log::info!("Deleted {deleted_count} alias(es), cache cleared");
    }
    Ok(DeleteAliasesResponse { deleted_count })
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    #[serde(default)]
    pub price_material: f64,
    #[serde(default)]
    pub price_labor: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "ks".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct AddItemResponse {
    pub item_id: i64,
}

pub async fn add_item(state: &AppState, request: AddItemRequest) -> AppResult<AddItemResponse> {
    let item_id = catalog::add_manual_item(
        &state.pool,
        &state.cache,
        &request.name,
        request.price_material,
        request.price_labor,
        &request.unit,
    )
    .await?;
    Ok(AddItemResponse { item_id })
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameItemRequest {
    pub item_id: i64,
    pub new_name: String,
}

/// Admin rename. The stored normalized name is recomputed, and since both
/// the old and the new spelling may sit in cached results, the whole cache
/// goes.
pub async fn rename_item(state: &AppState, request: RenameItemRequest) -> AppResult<()> {
    use crate::services::matcher::normalize::normalize_joined;
    use crate::types::AppError;

    let new_name = request.new_name.trim();
    let normalized = normalize_joined(new_name);
    if normalized.is_empty() {
        return Err(AppError::Validation("Item name must not be empty".into()));
    }

    let affected =
        item_repo::rename_item(&state.pool, request.item_id, new_name, &normalized).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Item {}", request.item_id)));
    }

    state.cache.invalidate(None);
    log::info!("Renamed item #{} to '{}'", request.item_id, new_name);
    Ok(())
}

/// Bulk reset of the whole catalog.
pub async fn reset_catalog(state: &AppState) -> AppResult<()> {
    catalog::reset_catalog(&state.pool, &state.cache).await
}

/// Plain name search (admin UI autocomplete), no scoring involved.
pub async fn search_items(state: &AppState, query: &str, limit: i64) -> AppResult<Vec<ItemRow>> {
    Ok(item_repo::search_items_by_name(&state.pool, query, limit).await?)
}

pub async fn item_history(state: &AppState, item_id: i64) -> AppResult<Vec<PriceHistoryPoint>> {
    Ok(price_repo::get_price_history(&state.pool, item_id).await?)
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub total_items: i64,
    pub total_prices: i64,
    pub total_aliases: i64,
    pub cached_results: usize,
    pub database_url: String,
}

pub async fn status(state: &AppState) -> AppResult<StatusResponse> {
    Ok(StatusResponse {
        total_items: item_repo::count_items(&state.pool).await?,
        total_prices: price_repo::count_prices(&state.pool).await?,
        total_aliases: alias_repo::count_aliases(&state.pool).await?,
        cached_results: state.cache.len(),
        database_url: state.config.database_url.clone(),
    })
}

#[cfg(test)]
#[path = "tests/admin_cmds_tests.rs"]
mod tests;
