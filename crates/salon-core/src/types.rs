//! # Domain Types
//!
//! Core domain types used throughout Salon POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CatalogItem   │   │     Client      │   │    Voucher      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  code           │       │
//! │  │  kind           │   │  loyalty_points │   │  discount       │       │
//! │  │  price_paise    │   │  wallet_balance │   │  is_active      │       │
//! │  │  commission     │   │  packages       │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    Discount     │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Fixed(Money)   │   │  Cash           │       │
//! │  │  1800 = 18%     │   │  Percentage(bps)│   │  Card           │       │
//! │  └─────────────────┘   └─────────────────┘   │  Upi            │       │
//! │                                              │  Wallet         │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (standard GST rate for salon services)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Item Kind
// =============================================================================

/// What a catalog entry (and a bill line) represents.
///
/// Services are performed by staff (commission attribution applies);
/// products are retail goods sold over the counter. Both price and total
/// identically; the kind participates in line merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Service,
    Product,
}

// =============================================================================
// Catalog Item
// =============================================================================

/// An entry in the external service/product catalog.
///
/// The billing core never mutates the catalog; it only snapshots entries
/// into bill lines (price frozen at time of adding).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Service or product.
    pub kind: ItemKind,

    /// Short lookup code (SKU/barcode style), optional.
    pub code: Option<String>,

    /// Display name shown to staff and on the invoice.
    pub name: String,

    /// Category for browsing (e.g. "Hair", "Skin", "Retail").
    pub category: String,

    /// Price in paise (smallest currency unit).
    pub price_paise: i64,

    /// Staff commission rate in basis points (display/reporting only,
    /// never part of totals).
    pub commission_rate_bps: u32,

    /// Whether the item is available for sale (soft delete).
    pub is_active: bool,

    /// When the item was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A pre-paid package held by a client.
///
/// Each session consumed zeroes the matching service line on the bill
/// instead of charging the per-visit price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientPackage {
    /// Service name the package covers (matched against bill line names).
    pub name: String,

    /// Remaining pre-paid sessions.
    pub sessions_left: i64,
}

/// A client from the external client directory.
///
/// Loyalty points are a currency amount (1 point = ₹1) held in paise so
/// redemption math shares the `Money` arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    pub phone: String,

    /// Redeemable loyalty balance in paise.
    pub loyalty_points_paise: i64,

    /// Redeemable wallet balance in paise.
    pub wallet_balance_paise: i64,

    /// Active pre-paid packages.
    pub packages: Vec<ClientPackage>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Returns the loyalty balance as Money.
    #[inline]
    pub fn loyalty_points(&self) -> Money {
        Money::from_paise(self.loyalty_points_paise)
    }

    /// Returns the wallet balance as Money.
    #[inline]
    pub fn wallet_balance(&self) -> Money {
        Money::from_paise(self.wallet_balance_paise)
    }

    /// Checks whether the client holds a package with sessions left for
    /// the given service name.
    pub fn has_package_for(&self, service_name: &str) -> bool {
        self.packages
            .iter()
            .any(|p| p.name == service_name && p.sessions_left > 0)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A single discount source: a fixed amount or a percentage of the
/// pre-discount subtotal.
///
/// ## Invariant
/// Every discount contribution is computed independently against the same
/// pre-discount subtotal and then summed. Percentages are never applied to
/// a running discounted balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Fixed amount in paise.
    Fixed(Money),
    /// Percentage in basis points (1000 = 10%).
    Percentage(u32),
}

impl Discount {
    /// Returns this discount's monetary contribution against a subtotal.
    ///
    /// Fixed amounts are taken as-is (not capped at the subtotal; the bill
    /// pipeline clamps later); percentages are bps of the subtotal.
    pub fn amount_against(&self, subtotal: Money) -> Money {
        match self {
            Discount::Fixed(amount) => *amount,
            Discount::Percentage(bps) => subtotal.percent_of(*bps),
        }
    }
}

// =============================================================================
// Promotion & Voucher
// =============================================================================

/// A catalog promotion selectable at billing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Promotion {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    pub discount: Discount,

    pub is_active: bool,
}

/// A voucher attached to a bill by code lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Voucher {
    /// Lookup code entered by staff.
    pub code: String,

    pub discount: Discount,

    pub is_active: bool,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a tender entry is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Online / UPI transfer.
    Upi,
    /// Store wallet top-up balance used as tender (distinct from wallet
    /// redemption, which reduces the taxable base).
    Wallet,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Upi
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(18.0);
        assert_eq!(rate.bps(), 1800);
    }

    #[test]
    fn test_discount_fixed_taken_as_is() {
        let discount = Discount::Fixed(Money::from_rupees(100));
        assert_eq!(
            discount.amount_against(Money::from_rupees(600)),
            Money::from_rupees(100)
        );
        // Not capped at the subtotal; clamping happens in the pipeline.
        assert_eq!(
            discount.amount_against(Money::from_rupees(50)),
            Money::from_rupees(100)
        );
    }

    #[test]
    fn test_discount_percentage_of_subtotal() {
        let discount = Discount::Percentage(1000); // 10%
        assert_eq!(
            discount.amount_against(Money::from_rupees(600)),
            Money::from_rupees(60)
        );
        assert_eq!(discount.amount_against(Money::zero()), Money::zero());
    }

    #[test]
    fn test_client_package_lookup() {
        let client = Client {
            id: "c1".to_string(),
            name: "Asha".to_string(),
            phone: "9876500000".to_string(),
            loyalty_points_paise: 0,
            wallet_balance_paise: 0,
            packages: vec![
                ClientPackage {
                    name: "Hair Spa".to_string(),
                    sessions_left: 2,
                },
                ClientPackage {
                    name: "Facial".to_string(),
                    sessions_left: 0,
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(client.has_package_for("Hair Spa"));
        assert!(!client.has_package_for("Facial")); // exhausted
        assert!(!client.has_package_for("Pedicure"));
    }
}
