//! # Cart Commands
//!
//! Tauri commands for the cart ledger of the in-progress bill.
//!
//! ## Bill Screen Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BILL                                       Asha Verma · 9876512345    │
//! │  ──────────────────────────────────────────────────────────────────    │
//! │  Haircut              x1    Ravi      ₹600.00                          │
//! │  Hair Spa (package)   x1    Sunita        ₹0.00                        │
//! │  Argan Oil Shampoo    x2              ₹1700.00                         │
//! │  ──────────────────────────────────────────────────────────────────    │
//! │  Subtotal                             ₹2300.00                         │
//! │  Discount                              -₹230.00                        │
//! │  Tax (18%)                              ₹372.60                        │
//! │  TOTAL                                ₹2442.60                         │
//! │                                                                         │
//! │  invoke('get_bill') → BillResponse (everything above)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{DbState, Register, RegisterState};
use salon_core::billing::{DiscountSelection, RedemptionSelection, Totals};
use salon_core::cart::BillLine;
use salon_core::payment::PaymentEntry;
use salon_core::types::Client;

/// Full bill snapshot for the frontend: one response shape for every
/// command that mutates the register.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub client: Option<Client>,
    pub lines: Vec<BillLine>,
    pub totals: Totals,
    pub discounts: DiscountSelection,
    pub redemption: RedemptionSelection,
    pub payments: Vec<PaymentEntry>,
    /// Maximum points redemption available right now (paise).
    pub points_cap_paise: i64,
    /// Maximum wallet redemption available right now (paise).
    pub wallet_cap_paise: i64,
    /// Amount still owed (positive) or overpaid (negative), in paise.
    pub remaining_paise: i64,
    pub checkout_pending: bool,
}

impl From<&Register> for BillResponse {
    fn from(register: &Register) -> Self {
        let totals = register.totals();
        BillResponse {
            client: register.client().cloned(),
            lines: register.cart().lines.clone(),
            totals,
            discounts: register.discounts().clone(),
            redemption: *register.redemption(),
            payments: register.payments().entries.clone(),
            points_cap_paise: register.points_cap().paise(),
            wallet_cap_paise: register.wallet_cap().paise(),
            remaining_paise: register.payments().remaining(totals.grand_total).paise(),
            checkout_pending: register.is_checkout_pending(),
        }
    }
}

/// Result of pulling from the pending-order inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Number of lines added to the bill (0 when the inbox was empty).
    pub imported_lines: usize,
    pub bill: BillResponse,
}

/// Gets the current bill.
#[tauri::command]
pub fn get_bill(register: State<'_, RegisterState>) -> BillResponse {
    debug!("get_bill command");
    register.with_register(|r| BillResponse::from(r))
}

/// Adds a catalog item to the bill.
///
/// ## Behavior
/// - Item already on the bill (same id and kind): quantity increases
/// - Otherwise: added as a new line with quantity 1
/// - Price is frozen at time of adding
#[tauri::command]
pub async fn add_to_bill(
    db: State<'_, DbState>,
    register: State<'_, RegisterState>,
    item_id: String,
) -> Result<BillResponse, ApiError> {
    debug!(item_id = %item_id, "add_to_bill command");

    let item = db
        .inner()
        .catalog()
        .get_by_id(&item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Catalog item", &item_id))?;

    if !item.is_active {
        return Err(ApiError::validation("Item is not available for sale"));
    }

    register.with_register_mut(|r| {
        r.add_item(&item)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Adjusts a line's quantity by a signed delta (clamped at 1; use
/// `remove_bill_line` to delete).
#[tauri::command]
pub fn update_line_quantity(
    register: State<'_, RegisterState>,
    index: usize,
    delta: i64,
) -> Result<BillResponse, ApiError> {
    debug!(index, delta, "update_line_quantity command");

    register.with_register_mut(|r| {
        r.update_quantity(index, delta)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Removes a line from the bill.
#[tauri::command]
pub fn remove_bill_line(
    register: State<'_, RegisterState>,
    index: usize,
) -> Result<BillResponse, ApiError> {
    debug!(index, "remove_bill_line command");

    register.with_register_mut(|r| {
        r.remove_line(index)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Sets (or clears) the staff member credited with a line.
///
/// The staff id is a free-form reference to the external staff directory
/// and only feeds commission attribution display, never totals.
#[tauri::command]
pub fn assign_line_staff(
    register: State<'_, RegisterState>,
    index: usize,
    staff_id: Option<String>,
) -> Result<BillResponse, ApiError> {
    debug!(index, staff_id = ?staff_id, "assign_line_staff command");

    register.with_register_mut(|r| {
        r.assign_staff(index, staff_id)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Toggles a line's package-redemption flag.
///
/// The ledger accepts the toggle unconditionally; this command is where
/// the UI affordance is restricted: enabling requires the selected client
/// to hold a package with sessions left matching the line's service name.
#[tauri::command]
pub fn toggle_line_package_redemption(
    register: State<'_, RegisterState>,
    index: usize,
) -> Result<BillResponse, ApiError> {
    debug!(index, "toggle_line_package_redemption command");

    register.with_register_mut(|r| {
        let line = r
            .cart()
            .lines
            .get(index)
            .ok_or_else(|| ApiError::not_found("Bill line", &index.to_string()))?;

        if !line.package_redemption {
            // Turning ON: check eligibility against the selected client.
            let service_name = line.name.clone();
            match r.client() {
                None => return Err(ApiError::validation("Select a client first")),
                Some(client) if !client.has_package_for(&service_name) => {
                    return Err(ApiError::validation(format!(
                        "{} has no active package for {}",
                        client.name, service_name
                    )))
                }
                Some(_) => {}
            }
        }

        r.toggle_package_redemption(index)?;
        Ok(BillResponse::from(&*r))
    })
}

/// Abandons the in-progress bill and starts a fresh one.
#[tauri::command]
pub fn reset_bill(register: State<'_, RegisterState>) -> Result<BillResponse, ApiError> {
    debug!("reset_bill command");

    register.with_register_mut(|r| {
        r.start_new_bill()?;
        Ok(BillResponse::from(&*r))
    })
}

/// Pulls the next pending order from the companion-app inbox onto the
/// bill. An explicit claim: nothing is imported until staff asks.
///
/// Orders restricted to the selected client are preferred; with no client
/// selected, the oldest unassigned order is taken.
#[tauri::command]
pub async fn import_pending_order(
    db: State<'_, DbState>,
    register: State<'_, RegisterState>,
) -> Result<ImportResponse, ApiError> {
    debug!("import_pending_order command");

    let client_id = register.with_register(|r| r.client().map(|c| c.id.clone()));

    let order = db
        .inner()
        .inbox()
        .take_next_for(client_id.as_deref())
        .await?;

    let Some(order) = order else {
        let bill = register.with_register(|r| BillResponse::from(r));
        return Ok(ImportResponse {
            imported_lines: 0,
            bill,
        });
    };

    let mut items = Vec::new();
    for item_id in &order.item_ids {
        let item = db
            .inner()
            .catalog()
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Catalog item", item_id))?;
        items.push(item);
    }

    register.with_register_mut(|r| {
        for item in &items {
            r.add_item(item)?;
        }
        Ok(ImportResponse {
            imported_lines: items.len(),
            bill: BillResponse::from(&*r),
        })
    })
}
