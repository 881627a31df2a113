//! # Cart Ledger
//!
//! The ordered collection of bill lines for the in-progress bill.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  Staff Action             Operation               Ledger Change         │
//! │  ────────────             ─────────               ─────────────         │
//! │                                                                         │
//! │  Pick catalog item ──────► add_item() ──────────► merge or push line   │
//! │                                                                         │
//! │  Quantity +/- ───────────► update_quantity() ───► qty = max(1, q+Δ)    │
//! │                                                                         │
//! │  Remove line ────────────► remove_line() ───────► lines.remove(i)      │
//! │                                                                         │
//! │  Pick stylist ───────────► assign_staff() ──────► staff id on line     │
//! │                                                                         │
//! │  Use package session ────► toggle_package_ ─────► line totals ₹0       │
//! │                            redemption()                                 │
//! │                                                                         │
//! │  NOTE: Every mutation invalidates derived totals; the register         │
//! │        recomputes them synchronously before anything reads them.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{BillingError, BillingResult};
use crate::money::Money;
use crate::types::{CatalogItem, ItemKind};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Bill Line
// =============================================================================

/// One entry in the bill representing a quantity of a single service or
/// product.
///
/// ## Price Freezing
/// `unit_price_paise` is captured when the catalog item is added. If the
/// catalog price changes afterwards, this line keeps the original price.
///
/// ## Invariants
/// - `quantity >= 1`
/// - `unit_price_paise >= 0`
/// - effective line total is zero while `package_redemption` is set
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    /// Catalog item ID (UUID).
    pub item_id: String,

    /// Service or product.
    pub kind: ItemKind,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Price in paise at time of adding (frozen).
    pub unit_price_paise: i64,

    /// Quantity on the bill.
    pub quantity: i64,

    /// Staff member credited with this line (commission attribution,
    /// display only, never part of totals). Free-form reference to the
    /// external staff directory; not validated here.
    pub assigned_staff_id: Option<String>,

    /// When set, the client is consuming a pre-paid package session and
    /// this line contributes zero to the subtotal.
    pub package_redemption: bool,
}

impl BillLine {
    /// Creates a new bill line from a catalog item with quantity 1.
    pub fn from_catalog_item(item: &CatalogItem) -> Self {
        BillLine {
            item_id: item.id.clone(),
            kind: item.kind,
            name: item.name.clone(),
            unit_price_paise: item.price_paise,
            quantity: 1,
            assigned_staff_id: None,
            package_redemption: false,
        }
    }

    /// The line's effective contribution to the subtotal.
    ///
    /// Package-redeemed lines contribute zero: the session was paid for
    /// when the package was sold.
    pub fn line_total(&self) -> Money {
        if self.package_redemption {
            Money::zero()
        } else {
            Money::from_paise(self.unit_price_paise).multiply_quantity(self.quantity)
        }
    }

    /// The line total ignoring the package-redemption flag (what the
    /// client would have paid; shown struck through on the bill).
    pub fn gross_total(&self) -> Money {
        Money::from_paise(self.unit_price_paise).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart ledger.
///
/// ## Invariants
/// - Lines are unique by `(item_id, kind)` (adding the same item again
///   increments quantity)
/// - Quantity never drops below 1 via `update_quantity`
/// - Maximum lines: 100, maximum quantity per line: 999
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines on the bill, in the order they were added.
    pub lines: Vec<BillLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a catalog item to the cart.
    ///
    /// ## Behavior
    /// - Same `(item_id, kind)` already on the bill: quantity + 1
    /// - Otherwise: new line with quantity 1, no staff, no package flag
    pub fn add_item(&mut self, item: &CatalogItem) -> BillingResult<()> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == item.id && l.kind == item.kind)
        {
            let new_qty = line.quantity + 1;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(BillingError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(BillingError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(BillLine::from_catalog_item(item));
        Ok(())
    }

    /// Adjusts a line's quantity by a signed delta.
    ///
    /// ## Behavior
    /// The result is clamped at 1: quantity can never drop below one via
    /// this operation. Use [`Cart::remove_line`] to delete a line.
    pub fn update_quantity(&mut self, index: usize, delta: i64) -> BillingResult<()> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(BillingError::LineNotFound { index })?;

        let new_qty = (line.quantity + delta).max(1);
        if new_qty > MAX_LINE_QUANTITY {
            return Err(BillingError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_LINE_QUANTITY,
            });
        }

        line.quantity = new_qty;
        Ok(())
    }

    /// Removes a line unconditionally.
    pub fn remove_line(&mut self, index: usize) -> BillingResult<BillLine> {
        if index >= self.lines.len() {
            return Err(BillingError::LineNotFound { index });
        }
        Ok(self.lines.remove(index))
    }

    /// Sets (or clears) the staff member credited with a line.
    ///
    /// The id is a free-form reference to the external staff directory;
    /// existence is not validated here.
    pub fn assign_staff(&mut self, index: usize, staff_id: Option<String>) -> BillingResult<()> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(BillingError::LineNotFound { index })?;
        line.assigned_staff_id = staff_id;
        Ok(())
    }

    /// Flips a line's package-redemption flag.
    ///
    /// Package eligibility (the client holds a matching package with
    /// sessions left) is a caller precondition; the ledger accepts the
    /// toggle unconditionally.
    pub fn toggle_package_redemption(&mut self, index: usize) -> BillingResult<bool> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(BillingError::LineNotFound { index })?;
        line.package_redemption = !line.package_redemption;
        Ok(line.package_redemption)
    }

    /// Clears all lines (new bill after checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of effective line totals (package-redeemed lines contribute 0).
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of lines on the bill.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Names of services currently marked as package redemptions,
    /// one entry per session consumed (quantity counts).
    pub fn package_redemption_names(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter(|l| l.package_redemption)
            .flat_map(|l| std::iter::repeat(l.name.clone()).take(l.quantity as usize))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_item(id: &str, kind: ItemKind, price_paise: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            kind,
            code: None,
            name: format!("Item {}", id),
            category: "Hair".to_string(),
            price_paise,
            commission_rate_bps: 1000,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_item_appends_line() {
        let mut cart = Cart::new();
        let item = test_item("1", ItemKind::Service, 60000);

        cart.add_item(&item).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].quantity, 1);
        assert_eq!(cart.lines[0].assigned_staff_id, None);
        assert!(!cart.lines[0].package_redemption);
        assert_eq!(cart.subtotal(), Money::from_rupees(600));
    }

    #[test]
    fn test_add_same_item_merges_by_id_and_kind() {
        let mut cart = Cart::new();
        let service = test_item("1", ItemKind::Service, 60000);

        cart.add_item(&service).unwrap();
        cart.add_item(&service).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].quantity, 2);

        // Same id but different kind does NOT merge.
        let product = test_item("1", ItemKind::Product, 60000);
        cart.add_item(&product).unwrap();
        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_update_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&test_item("1", ItemKind::Service, 60000)).unwrap();

        cart.update_quantity(0, 2).unwrap();
        assert_eq!(cart.lines[0].quantity, 3);

        cart.update_quantity(0, -10).unwrap();
        assert_eq!(cart.lines[0].quantity, 1);

        cart.update_quantity(0, -1).unwrap();
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_bad_index() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.update_quantity(0, 1),
            Err(BillingError::LineNotFound { index: 0 })
        ));
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        cart.add_item(&test_item("1", ItemKind::Service, 60000)).unwrap();
        cart.add_item(&test_item("2", ItemKind::Product, 40000)).unwrap();

        let removed = cart.remove_line(0).unwrap();
        assert_eq!(removed.item_id, "1");
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].item_id, "2");
    }

    #[test]
    fn test_assign_staff_free_form() {
        let mut cart = Cart::new();
        cart.add_item(&test_item("1", ItemKind::Service, 60000)).unwrap();

        cart.assign_staff(0, Some("staff-42".to_string())).unwrap();
        assert_eq!(cart.lines[0].assigned_staff_id.as_deref(), Some("staff-42"));

        cart.assign_staff(0, None).unwrap();
        assert_eq!(cart.lines[0].assigned_staff_id, None);

        // Staff assignment never affects totals.
        assert_eq!(cart.subtotal(), Money::from_rupees(600));
    }

    #[test]
    fn test_package_redemption_zeroes_line() {
        let mut cart = Cart::new();
        cart.add_item(&test_item("1", ItemKind::Service, 60000)).unwrap();
        cart.add_item(&test_item("2", ItemKind::Product, 40000)).unwrap();

        let on = cart.toggle_package_redemption(0).unwrap();
        assert!(on);
        assert_eq!(cart.lines[0].line_total(), Money::zero());
        assert_eq!(cart.lines[0].gross_total(), Money::from_rupees(600));
        assert_eq!(cart.subtotal(), Money::from_rupees(400));

        let off = cart.toggle_package_redemption(0).unwrap();
        assert!(!off);
        assert_eq!(cart.subtotal(), Money::from_rupees(1000));
    }

    #[test]
    fn test_package_redemption_names_count_quantity() {
        let mut cart = Cart::new();
        let item = test_item("1", ItemKind::Service, 60000);
        cart.add_item(&item).unwrap();
        cart.add_item(&item).unwrap();
        cart.toggle_package_redemption(0).unwrap();

        let names = cart.package_redemption_names();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n == "Item 1"));
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        cart.add_item(&test_item("1", ItemKind::Service, 60000)).unwrap();
        cart.update_quantity(0, MAX_LINE_QUANTITY - 1).unwrap();

        assert!(matches!(
            cart.update_quantity(0, 1),
            Err(BillingError::QuantityTooLarge { .. })
        ));
        assert!(matches!(
            cart.add_item(&test_item("1", ItemKind::Service, 60000)),
            Err(BillingError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_item("1", ItemKind::Service, 60000)).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }
}
