//! # Payment Commands
//!
//! The split-payment ledger for the in-progress bill.
//!
//! While exactly one entry exists, its amount tracks the grand total
//! automatically; adding a second entry switches all amounts to manual
//! and the mismatch (if any) is surfaced on every response until exact.

use tauri::State;
use tracing::debug;

use crate::commands::cart::BillResponse;
use crate::error::ApiError;
use crate::state::RegisterState;
use salon_core::{Money, PaymentMethod};

/// Appends a new payment entry defaulted to `{online, 0}`.
#[tauri::command]
pub fn add_payment_method(register: State<'_, RegisterState>) -> Result<BillResponse, ApiError> {
    debug!("add_payment_method command");

    register.with_register_mut(|r| {
        r.add_payment_entry()?;
        Ok(BillResponse::from(&*r))
    })
}

/// Updates one payment entry's method and/or amount.
#[tauri::command]
pub fn update_payment_entry(
    register: State<'_, RegisterState>,
    index: usize,
    method: Option<PaymentMethod>,
    amount_paise: Option<i64>,
) -> Result<BillResponse, ApiError> {
    debug!(index, method = ?method, amount_paise = ?amount_paise, "update_payment_entry command");

    register.with_register_mut(|r| {
        if let Some(method) = method {
            r.set_payment_method(index, method)?;
        }
        if let Some(paise) = amount_paise {
            r.set_payment_amount(index, Money::from_paise(paise))?;
        }
        Ok(BillResponse::from(&*r))
    })
}

/// Removes a payment entry. The last remaining entry cannot be removed.
#[tauri::command]
pub fn remove_payment_entry(
    register: State<'_, RegisterState>,
    index: usize,
) -> Result<BillResponse, ApiError> {
    debug!(index, "remove_payment_entry command");

    register.with_register_mut(|r| {
        r.remove_payment_entry(index)?;
        Ok(BillResponse::from(&*r))
    })
}
