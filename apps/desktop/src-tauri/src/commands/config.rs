//! # Config Commands
//!
//! Configuration retrieval for the frontend.

use tauri::State;
use tracing::debug;

use crate::state::ConfigState;

/// Returns the application configuration (store identity, currency,
/// default tax rate).
#[tauri::command]
pub fn get_config(config: State<'_, ConfigState>) -> ConfigState {
    debug!("get_config command");
    config.inner().clone()
}
