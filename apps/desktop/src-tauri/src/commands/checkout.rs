//! # Checkout Commands
//!
//! The one operation in the billing subsystem with lasting effect.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  invoke('checkout')                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. begin_checkout()  ── validates client / cart / payments,           │
//! │     (register lock)      freezes a CheckoutDraft, sets pending flag    │
//! │       │                  (second submission → CHECKOUT_ERROR)          │
//! │       ▼                                                                 │
//! │  2. settlement delay  ── simulated latency (config.checkout_settle_ms) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. allocate invoice number (atomic per-day counter)                    │
//! │  4. assemble + persist the invoice document                             │
//! │  5. settle client balances, consume package sessions                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  6. complete_checkout() ── register resets to Idle                     │
//! │                                                                         │
//! │  Any failure after step 1 → abort_checkout(): the bill survives        │
//! │  untouched and the error is surfaced inline.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CheckoutDraft, ConfigState, DbState, RegisterState};
use salon_core::checkout::assemble_invoice;
use salon_core::Invoice;
use salon_db::Database;

/// Summary row for the recent-invoices list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummaryResponse {
    pub invoice_number: String,
    pub client_id: String,
    pub grand_total_paise: i64,
    pub timestamp: String,
}

/// Finalizes the bill into an invoice.
#[tauri::command]
pub async fn checkout(
    db: State<'_, DbState>,
    register: State<'_, RegisterState>,
    config: State<'_, ConfigState>,
) -> Result<Invoice, ApiError> {
    debug!("checkout command");

    // Validation + draft freeze happen under the register lock; the lock
    // is released during settlement so the UI can keep reading the bill
    // (mutations of a pending bill are rejected by the pending flag at
    // the next begin_checkout, and the draft is already frozen).
    let draft = register
        .with_register_mut(|r| r.begin_checkout())
        .map_err(ApiError::from)?;

    match finalize(db.inner(), &draft, config.checkout_settle_ms).await {
        Ok(invoice) => {
            register.with_register_mut(|r| r.complete_checkout());
            info!(
                invoice_number = %invoice.invoice_number,
                grand_total = %invoice.totals.grand_total,
                loyalty_earned = invoice.loyalty_earned_points,
                "Checkout complete"
            );
            Ok(invoice)
        }
        Err(err) => {
            // The bill survives untouched for correction and retry.
            register.with_register_mut(|r| r.abort_checkout());
            warn!(error = %err, "Checkout failed, register preserved");
            Err(err)
        }
    }
}

/// Settlement: the awaitable tail of a checkout, run without holding the
/// register lock.
async fn finalize(
    db: &Database,
    draft: &CheckoutDraft,
    settle_ms: u64,
) -> Result<Invoice, ApiError> {
    // Simulated settlement latency. Duplicate submissions are rejected
    // by the register's pending flag while this runs.
    tokio::time::sleep(Duration::from_millis(settle_ms)).await;

    let now = Utc::now();
    let invoice_number = db.invoices().next_invoice_number(now).await?;

    let invoice = assemble_invoice(
        invoice_number,
        now,
        &draft.client,
        &draft.cart,
        &draft.totals,
        &draft.payments,
        &draft.discounts,
        &draft.redemption,
    )?;

    db.invoices().insert(&invoice).await?;

    db.clients()
        .settle_after_checkout(
            &draft.client.id,
            draft.redemption.points_redeemed,
            draft.redemption.wallet_redeemed,
            invoice.loyalty_earned_points,
        )
        .await?;

    for service_name in draft.cart.package_redemption_names() {
        db.clients()
            .consume_package_session(&draft.client.id, &service_name)
            .await?;
    }

    Ok(invoice)
}

/// Loads a finished invoice by number (reprint, export).
#[tauri::command]
pub async fn get_invoice(
    db: State<'_, DbState>,
    invoice_number: String,
) -> Result<Invoice, ApiError> {
    debug!(invoice_number = %invoice_number, "get_invoice command");

    db.inner()
        .invoices()
        .get_by_number(&invoice_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice", &invoice_number))
}

/// Lists the most recent invoices.
#[tauri::command]
pub async fn list_recent_invoices(
    db: State<'_, DbState>,
    limit: Option<i64>,
) -> Result<Vec<InvoiceSummaryResponse>, ApiError> {
    let limit = limit.unwrap_or(50);
    debug!(limit, "list_recent_invoices command");

    let summaries = db.inner().invoices().list_recent(limit).await?;

    Ok(summaries
        .into_iter()
        .map(|s| InvoiceSummaryResponse {
            invoice_number: s.invoice_number,
            client_id: s.client_id,
            grand_total_paise: s.grand_total_paise,
            timestamp: s.created_at.to_rfc3339(),
        })
        .collect())
}
