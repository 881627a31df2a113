//! # Client Commands
//!
//! Selecting the client for the in-progress bill.

use tauri::State;
use tracing::debug;

use crate::commands::cart::BillResponse;
use crate::error::ApiError;
use crate::state::{DbState, RegisterState};
use salon_core::validation::validate_search_query;
use salon_core::Client;

/// Searches clients by name or phone.
#[tauri::command]
pub async fn search_clients(
    db: State<'_, DbState>,
    query: String,
    limit: Option<i64>,
) -> Result<Vec<Client>, ApiError> {
    let limit = limit.unwrap_or(20);
    debug!(query = %query, limit, "search_clients command");

    let query = validate_search_query(&query).map_err(|e| ApiError::validation(e.to_string()))?;

    let clients = db.inner().clients().search(&query, limit).await?;
    Ok(clients)
}

/// Puts a client on the bill (loaded with packages so the
/// package-redemption affordance can be shown per line).
///
/// Selecting a different client resets any redemptions: the caps belong
/// to the new client.
#[tauri::command]
pub async fn select_client(
    db: State<'_, DbState>,
    register: State<'_, RegisterState>,
    client_id: String,
) -> Result<BillResponse, ApiError> {
    debug!(client_id = %client_id, "select_client command");

    let client = db
        .inner()
        .clients()
        .get_by_id(&client_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", &client_id))?;

    register.with_register_mut(|r| {
        r.select_client(client)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Takes the client off the bill.
#[tauri::command]
pub fn clear_client(register: State<'_, RegisterState>) -> Result<BillResponse, ApiError> {
    debug!("clear_client command");

    register.with_register_mut(|r| {
        r.clear_client()?;
        Ok(BillResponse::from(&*r))
    })
}
