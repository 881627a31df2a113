//! # Billing Commands
//!
//! Discount sources and loyalty/wallet redemption on the in-progress
//! bill. All three discount sources (manual, promotion, voucher) may be
//! active together; their contributions are additive against the same
//! subtotal.

use tauri::State;
use tracing::{debug, info};

use crate::commands::cart::BillResponse;
use crate::error::ApiError;
use crate::state::{DbState, RegisterState};
use salon_core::validation::validate_voucher_code;
use salon_core::{BillingError, Discount, Money, Promotion};

/// Sets the ad-hoc manual discount.
#[tauri::command]
pub fn set_manual_discount(
    register: State<'_, RegisterState>,
    discount: Discount,
) -> Result<BillResponse, ApiError> {
    debug!(discount = ?discount, "set_manual_discount command");

    register.with_register_mut(|r| {
        r.set_manual_discount(discount)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Clears the manual discount.
#[tauri::command]
pub fn clear_manual_discount(
    register: State<'_, RegisterState>,
) -> Result<BillResponse, ApiError> {
    debug!("clear_manual_discount command");

    register.with_register_mut(|r| {
        r.clear_manual_discount()?;
        Ok(BillResponse::from(&*r))
    })
}

/// Lists active promotions for the billing screen.
#[tauri::command]
pub async fn list_promotions(db: State<'_, DbState>) -> Result<Vec<Promotion>, ApiError> {
    debug!("list_promotions command");
    Ok(db.inner().vouchers().list_promotions().await?)
}

/// Applies a promotion by id. Toggle semantics: applying the promotion
/// that is already active clears it.
#[tauri::command]
pub async fn apply_promotion(
    db: State<'_, DbState>,
    register: State<'_, RegisterState>,
    promotion_id: String,
) -> Result<BillResponse, ApiError> {
    debug!(promotion_id = %promotion_id, "apply_promotion command");

    let promotion = db
        .inner()
        .vouchers()
        .get_promotion(&promotion_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Promotion", &promotion_id))?;

    register.with_register_mut(|r| {
        r.apply_promotion(promotion)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Attaches a voucher by code lookup.
///
/// An unknown or inactive code fails with `INVALID_VOUCHER` and leaves
/// the bill's discount state untouched.
#[tauri::command]
pub async fn apply_voucher_code(
    db: State<'_, DbState>,
    register: State<'_, RegisterState>,
    code: String,
) -> Result<BillResponse, ApiError> {
    debug!(code = %code, "apply_voucher_code command");

    let code = validate_voucher_code(&code).map_err(|e| ApiError::validation(e.to_string()))?;

    let voucher = db
        .inner()
        .vouchers()
        .find_voucher(&code)
        .await?
        .ok_or_else(|| ApiError::from(BillingError::InvalidVoucherCode(code.clone())))?;

    info!(code = %code, "Voucher attached");

    register.with_register_mut(|r| {
        r.attach_voucher(voucher)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Detaches the voucher.
#[tauri::command]
pub fn clear_voucher(register: State<'_, RegisterState>) -> Result<BillResponse, ApiError> {
    debug!("clear_voucher command");

    register.with_register_mut(|r| {
        r.clear_voucher()?;
        Ok(BillResponse::from(&*r))
    })
}

/// All-or-nothing loyalty points toggle: off if on, otherwise redeem the
/// maximum permitted in one step.
#[tauri::command]
pub fn toggle_redeem_points(
    register: State<'_, RegisterState>,
) -> Result<BillResponse, ApiError> {
    debug!("toggle_redeem_points command");

    register.with_register_mut(|r| {
        r.toggle_points()?;
        Ok(BillResponse::from(&*r))
    })
}

/// All-or-nothing wallet toggle.
#[tauri::command]
pub fn toggle_redeem_wallet(
    register: State<'_, RegisterState>,
) -> Result<BillResponse, ApiError> {
    debug!("toggle_redeem_wallet command");

    register.with_register_mut(|r| {
        r.toggle_wallet()?;
        Ok(BillResponse::from(&*r))
    })
}

/// Sets an explicit points redemption amount (0 ≤ amount ≤ cap).
///
/// The toggle above is a convenience wrapper over this; partial amounts
/// are fully supported.
#[tauri::command]
pub fn set_points_redemption(
    register: State<'_, RegisterState>,
    amount_paise: i64,
) -> Result<BillResponse, ApiError> {
    debug!(amount_paise, "set_points_redemption command");

    register.with_register_mut(|r| {
        r.set_points(Money::from_paise(amount_paise))?;
        Ok(BillResponse::from(&*r))
    })
}

/// Sets an explicit wallet redemption amount (0 ≤ amount ≤ cap).
#[tauri::command]
pub fn set_wallet_redemption(
    register: State<'_, RegisterState>,
    amount_paise: i64,
) -> Result<BillResponse, ApiError> {
    debug!(amount_paise, "set_wallet_redemption command");

    register.with_register_mut(|r| {
        r.set_wallet(Money::from_paise(amount_paise))?;
        Ok(BillResponse::from(&*r))
    })
}
