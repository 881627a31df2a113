//! # salon-core: Pure Billing Logic for Salon POS
//!
//! This crate is the **heart** of Salon POS. It contains the entire bill
//! computation engine as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salon POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (WebView)                           │   │
//! │  │   Catalog UI ──► Bill UI ──► Tender UI ──► Invoice UI          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Tauri IPC                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Tauri Commands                               │   │
//! │  │    add_to_bill, apply_voucher_code, checkout, etc.             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  billing  │  │  payment  │  │ checkout  │  │   │
//! │  │   │  ledger   │  │ calculator│  │ reconciler│  │ assembler │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    salon-db (Database Layer)                    │   │
//! │  │       SQLite: catalog, clients, vouchers, invoices, inbox       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, Client, Discount, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Billing error types
//! - [`validation`] - Input validation
//! - [`cart`] - The cart ledger (bill lines)
//! - [`billing`] - The bill calculator and discount/redemption selector
//! - [`payment`] - The payment split reconciler
//! - [`checkout`] - The invoice assembler
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every computation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Never Negative**: Discounts and redemptions clamp at zero; the bill
//!    can be consumed entirely but can never go below ₹0
//!
//! ## Example Usage
//!
//! ```rust
//! use salon_core::billing::{compute_totals, DiscountSelection, RedemptionSelection};
//! use salon_core::cart::Cart;
//! use salon_core::types::TaxRate;
//!
//! let cart = Cart::new();
//! let totals = compute_totals(
//!     &cart,
//!     &DiscountSelection::default(),
//!     &RedemptionSelection::default(),
//!     TaxRate::from_bps(1800), // 18% GST
//! );
//! assert!(totals.grand_total.is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use salon_core::Money` instead of
// `use salon_core::money::Money`

pub use billing::{
    compute_totals, max_points_redemption, max_wallet_redemption, DiscountSelection,
    RedemptionSelection, Totals,
};
pub use cart::{BillLine, Cart};
pub use checkout::{assemble_invoice, loyalty_earned, ClientSnapshot, Invoice};
pub use error::{BillingError, BillingResult, ValidationError};
pub use money::Money;
pub use payment::{PaymentEntry, PaymentSplit};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single bill
///
/// Prevents runaway bills and keeps transactions reviewable at the desk.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line
///
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Paise of grand total per loyalty point earned (1 point per full ₹100).
pub const LOYALTY_EARN_DIVISOR_PAISE: i64 = 10_000;
