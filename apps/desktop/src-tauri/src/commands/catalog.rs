//! # Catalog Commands
//!
//! Search and lookup over the service/product catalog.

use tauri::State;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use salon_core::validation::validate_search_query;
use salon_core::CatalogItem;

/// Searches active catalog items by name or category.
///
/// ## Arguments
/// * `query` - Free text (empty returns the first page of everything)
/// * `limit` - Maximum results (default: 20)
#[tauri::command]
pub async fn search_catalog(
    db: State<'_, DbState>,
    query: String,
    limit: Option<i64>,
) -> Result<Vec<CatalogItem>, ApiError> {
    let limit = limit.unwrap_or(20);
    debug!(query = %query, limit, "search_catalog command");

    let query = validate_search_query(&query).map_err(|e| ApiError::validation(e.to_string()))?;

    let items = db.inner().catalog().search(&query, limit).await?;
    Ok(items)
}

/// Looks up a catalog item by its short code (SKU/barcode entry on the
/// billing screen).
#[tauri::command]
pub async fn find_catalog_item_by_code(
    db: State<'_, DbState>,
    code: String,
) -> Result<CatalogItem, ApiError> {
    debug!(code = %code, "find_catalog_item_by_code command");

    db.inner()
        .catalog()
        .find_by_code(code.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Catalog item", &code))
}
