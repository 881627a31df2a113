//! # Invoice Assembler
//!
//! Turns a validated bill into an immutable [`Invoice`] record, the only
//! event in the billing subsystem with lasting effect.
//!
//! ## Snapshot Pattern
//! The invoice owns deep copies of the cart lines, totals, payments, and
//! discounts at the moment of checkout. Later mutations of the register
//! (the next client's bill) can never reach into a finished invoice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::billing::{DiscountSelection, RedemptionSelection, Totals};
use crate::cart::{BillLine, Cart};
use crate::error::{BillingError, BillingResult};
use crate::payment::{PaymentEntry, PaymentSplit};
use crate::types::Client;

// =============================================================================
// Client Snapshot
// =============================================================================

/// The client fields frozen onto an invoice.
///
/// Balances are not snapshotted: they live in the client directory and
/// change as the invoice settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshot {
    pub id: String,
    pub name: String,
    pub phone: String,
}

impl From<&Client> for ClientSnapshot {
    fn from(client: &Client) -> Self {
        ClientSnapshot {
            id: client.id.clone(),
            name: client.name.clone(),
            phone: client.phone.clone(),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized bill. Created once at successful checkout, read-only
/// afterward; persisted as a single JSON document keyed by
/// `invoice_number` and fed to receipt/PDF renderers downstream.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique invoice number (allocated by the invoice counter).
    pub invoice_number: String,

    /// When the checkout completed.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    pub client: ClientSnapshot,

    /// Bill lines at checkout (deep copy).
    pub lines: Vec<BillLine>,

    /// Totals breakdown at checkout.
    pub totals: Totals,

    /// Tender entries at checkout (deep copy).
    pub payments: Vec<PaymentEntry>,

    /// Discount sources applied (deep copy).
    pub discounts: DiscountSelection,

    /// Loyalty/wallet amounts redeemed against this bill.
    pub redemption: RedemptionSelection,

    /// Loyalty points earned by this bill: `floor(grand_total_rupees / 100)`.
    pub loyalty_earned_points: i64,
}

/// Loyalty points earned by a bill: one point per full ₹100 of the grand
/// total.
pub fn loyalty_earned(totals: &Totals) -> i64 {
    totals.grand_total.paise() / crate::LOYALTY_EARN_DIVISOR_PAISE
}

/// Assembles an invoice from the finished bill.
///
/// ## Preconditions (validated here)
/// - the cart is non-empty (`EmptyCart`)
/// - payments sum to the grand total exactly (`PaymentMismatch`)
///
/// Client selection is the register's precondition (`NoClientSelected` is
/// raised before this function is reachable); the assembler takes the
/// selected client by reference.
///
/// The caller supplies the unique `invoice_number` and the timestamp so
/// the assembler stays pure and reproducible.
pub fn assemble_invoice(
    invoice_number: String,
    now: DateTime<Utc>,
    client: &Client,
    cart: &Cart,
    totals: &Totals,
    payments: &PaymentSplit,
    discounts: &DiscountSelection,
    redemption: &RedemptionSelection,
) -> BillingResult<Invoice> {
    if cart.is_empty() {
        return Err(BillingError::EmptyCart);
    }
    payments.check_balanced(totals.grand_total)?;

    Ok(Invoice {
        invoice_number,
        created_at: now,
        client: ClientSnapshot::from(client),
        lines: cart.lines.clone(),
        totals: *totals,
        payments: payments.entries.clone(),
        discounts: discounts.clone(),
        redemption: *redemption,
        loyalty_earned_points: loyalty_earned(totals),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::compute_totals;
    use crate::money::Money;
    use crate::types::{CatalogItem, ItemKind, PaymentMethod, TaxRate};

    fn test_item(id: &str, price_rupees: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            kind: ItemKind::Service,
            code: None,
            name: format!("Service {}", id),
            category: "Hair".to_string(),
            price_paise: price_rupees * 100,
            commission_rate_bps: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_client() -> Client {
        Client {
            id: "c1".to_string(),
            name: "Meera".to_string(),
            phone: "9876500000".to_string(),
            loyalty_points_paise: 0,
            wallet_balance_paise: 0,
            packages: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn checked_out_bill() -> (Cart, Totals, PaymentSplit) {
        let mut cart = Cart::new();
        cart.add_item(&test_item("1", 600)).unwrap();
        let totals = compute_totals(
            &cart,
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
            TaxRate::from_bps(1800),
        );
        let mut payments = PaymentSplit::new();
        payments.sync_to_total(totals.grand_total);
        (cart, totals, payments)
    }

    #[test]
    fn test_assemble_invoice() {
        let (cart, totals, payments) = checked_out_bill();
        let client = test_client();

        let invoice = assemble_invoice(
            "INV-20260806-0001".to_string(),
            Utc::now(),
            &client,
            &cart,
            &totals,
            &payments,
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
        )
        .unwrap();

        assert_eq!(invoice.invoice_number, "INV-20260806-0001");
        assert_eq!(invoice.client.name, "Meera");
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.totals.grand_total, Money::from_rupees(708));
        assert_eq!(invoice.payments[0].method, PaymentMethod::Upi);
        // ₹708 earns floor(708 / 100) = 7 points
        assert_eq!(invoice.loyalty_earned_points, 7);
    }

    #[test]
    fn test_snapshot_is_immune_to_later_mutation() {
        let (mut cart, totals, payments) = checked_out_bill();
        let client = test_client();

        let invoice = assemble_invoice(
            "INV-20260806-0002".to_string(),
            Utc::now(),
            &client,
            &cart,
            &totals,
            &payments,
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
        )
        .unwrap();

        // The next bill starts: the finished invoice must not change.
        cart.clear();
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.totals.grand_total, Money::from_rupees(708));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let client = test_client();
        let err = assemble_invoice(
            "INV-20260806-0003".to_string(),
            Utc::now(),
            &client,
            &Cart::new(),
            &Totals::default(),
            &PaymentSplit::new(),
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BillingError::EmptyCart));
    }

    #[test]
    fn test_payment_mismatch_rejected() {
        let (cart, totals, mut payments) = checked_out_bill();
        payments.set_amount(0, Money::from_rupees(700)).unwrap();
        let client = test_client();

        let err = assemble_invoice(
            "INV-20260806-0004".to_string(),
            Utc::now(),
            &client,
            &cart,
            &totals,
            &payments,
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
        )
        .unwrap_err();
        assert_eq!(err.shortfall(), Some(Money::from_rupees(8)));
    }

    #[test]
    fn test_loyalty_earned_floors() {
        let mut totals = Totals::default();

        totals.grand_total = Money::from_paise(72216); // ₹722.16
        assert_eq!(loyalty_earned(&totals), 7);

        totals.grand_total = Money::from_rupees(99);
        assert_eq!(loyalty_earned(&totals), 0);

        totals.grand_total = Money::from_rupees(100);
        assert_eq!(loyalty_earned(&totals), 1);
    }

    #[test]
    fn test_invoice_serializes_as_single_document() {
        let (cart, totals, payments) = checked_out_bill();
        let client = test_client();

        let invoice = assemble_invoice(
            "INV-20260806-0005".to_string(),
            Utc::now(),
            &client,
            &cart,
            &totals,
            &payments,
            &DiscountSelection::default(),
            &RedemptionSelection::default(),
        )
        .unwrap();

        let json = serde_json::to_string(&invoice).unwrap();
        let back: Invoice = serde_json::from_str(&json).unwrap();
        assert_eq!(back.invoice_number, invoice.invoice_number);
        assert_eq!(back.totals, invoice.totals);
        assert_eq!(back.payments, invoice.payments);
    }
}
