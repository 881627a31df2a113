//! # Register State
//!
//! The in-progress bill session: selected client, cart ledger, discount
//! and redemption selections, and the payment split: everything that
//! exists between "new bill" and "invoice created".
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Register Lifecycle                                 │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌─────────────┐     ┌──────────┐    │
//! │  │   Idle   │────►│ Building │────►│ Checking Out│────►│ Invoice  │    │
//! │  │ (empty)  │     │   Bill   │     │  (pending)  │     │ Created  │    │
//! │  └──────────┘     └──────────┘     └──────┬──────┘     └────┬─────┘    │
//! │       ▲                │                  │                 │          │
//! │       │           add/update/        validation        reset_bill     │
//! │       │           discount/redeem     failure ──► back │               │
//! │       │                               to Building      │               │
//! │       └────────────────────────────────────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Guarantee
//! Every mutation ends in [`Register::refresh`]: redemptions are clamped
//! back under their (possibly shrunken) caps and the single-entry payment
//! auto-sync runs. Totals therefore always reflect the latest state
//! synchronously before any checkout validation reads them; there is no
//! eventual-consistency window.

use std::sync::{Arc, Mutex};

use salon_core::billing::{
    compute_totals, max_points_redemption, max_wallet_redemption, DiscountSelection,
    RedemptionSelection, Totals,
};
use salon_core::cart::Cart;
use salon_core::error::{BillingError, BillingResult};
use salon_core::payment::PaymentSplit;
use salon_core::types::{CatalogItem, Client, Discount, PaymentMethod, Promotion, TaxRate, Voucher};
use salon_core::validation::validate_discount;
use salon_core::Money;

// =============================================================================
// Checkout Draft
// =============================================================================

/// Frozen copy of the register handed to the checkout command the moment
/// validation passes. The register lock is released while the settlement
/// delay runs; the draft keeps checkout working on exactly the state that
/// was validated.
#[derive(Debug, Clone)]
pub struct CheckoutDraft {
    pub client: Client,
    pub cart: Cart,
    pub totals: Totals,
    pub payments: PaymentSplit,
    pub discounts: DiscountSelection,
    pub redemption: RedemptionSelection,
}

// =============================================================================
// Register
// =============================================================================

/// The mutable bill session.
///
/// All field access goes through methods so that every mutation runs the
/// refresh pass (redemption re-clamp + payment auto-sync) before the lock
/// is released.
#[derive(Debug)]
pub struct Register {
    client: Option<Client>,
    cart: Cart,
    discounts: DiscountSelection,
    redemption: RedemptionSelection,
    payments: PaymentSplit,
    tax_rate: TaxRate,
    checkout_pending: bool,
}

impl Register {
    /// Creates an idle register with the store's tax rate.
    pub fn new(tax_rate: TaxRate) -> Self {
        Register {
            client: None,
            cart: Cart::new(),
            discounts: DiscountSelection::default(),
            redemption: RedemptionSelection::default(),
            payments: PaymentSplit::new(),
            tax_rate,
            checkout_pending: false,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn discounts(&self) -> &DiscountSelection {
        &self.discounts
    }

    pub fn redemption(&self) -> &RedemptionSelection {
        &self.redemption
    }

    pub fn payments(&self) -> &PaymentSplit {
        &self.payments
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn is_checkout_pending(&self) -> bool {
        self.checkout_pending
    }

    /// Current totals, computed fresh from the live inputs.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.cart, &self.discounts, &self.redemption, self.tax_rate)
    }

    /// Maximum points redemption for the selected client right now.
    /// Zero when no client is selected.
    pub fn points_cap(&self) -> Money {
        let Some(client) = &self.client else {
            return Money::zero();
        };
        let subtotal = self.cart.subtotal();
        let discount_total = self.discounts.total_against(subtotal);
        max_points_redemption(client, subtotal, discount_total)
    }

    /// Maximum wallet redemption, computed after the points already
    /// redeemed (fixed order: discounts → points → wallet).
    pub fn wallet_cap(&self) -> Money {
        let Some(client) = &self.client else {
            return Money::zero();
        };
        let subtotal = self.cart.subtotal();
        let discount_total = self.discounts.total_against(subtotal);
        max_wallet_redemption(
            client,
            subtotal,
            discount_total,
            self.redemption.points_redeemed,
        )
    }

    /// Rejects mutation while a checkout is settling: the draft under
    /// settlement was validated against the current state, and the reset
    /// on completion would silently discard concurrent edits.
    fn ensure_editable(&self) -> BillingResult<()> {
        if self.checkout_pending {
            return Err(BillingError::CheckoutInProgress);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Client selection
    // -------------------------------------------------------------------------

    /// Puts a client on the bill. Redemptions reset: the caps belong to
    /// the new client.
    pub fn select_client(&mut self, client: Client) -> BillingResult<()> {
        self.ensure_editable()?;
        self.client = Some(client);
        self.redemption.clear();
        self.refresh();
        Ok(())
    }

    /// Takes the client off the bill. Any redemptions die with them.
    pub fn clear_client(&mut self) -> BillingResult<()> {
        self.ensure_editable()?;
        self.client = None;
        self.redemption.clear();
        self.refresh();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Cart ledger operations
    // -------------------------------------------------------------------------

    pub fn add_item(&mut self, item: &CatalogItem) -> BillingResult<()> {
        self.ensure_editable()?;
        self.cart.add_item(item)?;
        self.refresh();
        Ok(())
    }

    pub fn update_quantity(&mut self, index: usize, delta: i64) -> BillingResult<()> {
        self.ensure_editable()?;
        self.cart.update_quantity(index, delta)?;
        self.refresh();
        Ok(())
    }

    pub fn remove_line(&mut self, index: usize) -> BillingResult<()> {
        self.ensure_editable()?;
        self.cart.remove_line(index)?;
        self.refresh();
        Ok(())
    }

    pub fn assign_staff(&mut self, index: usize, staff_id: Option<String>) -> BillingResult<()> {
        // Never affects totals, but refresh anyway: one code path.
        self.ensure_editable()?;
        self.cart.assign_staff(index, staff_id)?;
        self.refresh();
        Ok(())
    }

    pub fn toggle_package_redemption(&mut self, index: usize) -> BillingResult<bool> {
        self.ensure_editable()?;
        let now_on = self.cart.toggle_package_redemption(index)?;
        self.refresh();
        Ok(now_on)
    }

    // -------------------------------------------------------------------------
    // Discounts
    // -------------------------------------------------------------------------

    pub fn set_manual_discount(&mut self, discount: Discount) -> BillingResult<()> {
        self.ensure_editable()?;
        validate_discount(&discount)?;
        self.discounts.manual = Some(discount);
        self.refresh();
        Ok(())
    }

    pub fn clear_manual_discount(&mut self) -> BillingResult<()> {
        self.ensure_editable()?;
        self.discounts.manual = None;
        self.refresh();
        Ok(())
    }

    /// Toggle semantics: applying the already-active promotion clears it.
    pub fn apply_promotion(&mut self, promotion: Promotion) -> BillingResult<()> {
        self.ensure_editable()?;
        self.discounts.set_promotion(promotion);
        self.refresh();
        Ok(())
    }

    pub fn clear_promotion(&mut self) -> BillingResult<()> {
        self.ensure_editable()?;
        self.discounts.clear_promotion();
        self.refresh();
        Ok(())
    }

    pub fn attach_voucher(&mut self, voucher: Voucher) -> BillingResult<()> {
        self.ensure_editable()?;
        self.discounts.set_voucher(voucher);
        self.refresh();
        Ok(())
    }

    pub fn clear_voucher(&mut self) -> BillingResult<()> {
        self.ensure_editable()?;
        self.discounts.clear_voucher();
        self.refresh();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Redemptions
    // -------------------------------------------------------------------------

    /// Sets an explicit points amount (≤ cap). The UI toggle is
    /// [`Register::toggle_points`].
    pub fn set_points(&mut self, amount: Money) -> BillingResult<()> {
        self.ensure_editable()?;
        if self.client.is_none() && amount.is_positive() {
            return Err(BillingError::NoClientSelected);
        }
        let cap = self.points_cap();
        self.redemption.set_points(amount, cap)?;
        self.refresh();
        Ok(())
    }

    /// Sets an explicit wallet amount (≤ cap).
    pub fn set_wallet(&mut self, amount: Money) -> BillingResult<()> {
        self.ensure_editable()?;
        if self.client.is_none() && amount.is_positive() {
            return Err(BillingError::NoClientSelected);
        }
        let cap = self.wallet_cap();
        self.redemption.set_wallet(amount, cap)?;
        self.refresh();
        Ok(())
    }

    /// All-or-nothing points toggle. Returns the new amount.
    pub fn toggle_points(&mut self) -> BillingResult<Money> {
        self.ensure_editable()?;
        if self.client.is_none() {
            return Err(BillingError::NoClientSelected);
        }
        let cap = self.points_cap();
        let now = self.redemption.toggle_points(cap);
        self.refresh();
        Ok(now)
    }

    /// All-or-nothing wallet toggle. Returns the new amount.
    pub fn toggle_wallet(&mut self) -> BillingResult<Money> {
        self.ensure_editable()?;
        if self.client.is_none() {
            return Err(BillingError::NoClientSelected);
        }
        let cap = self.wallet_cap();
        let now = self.redemption.toggle_wallet(cap);
        self.refresh();
        Ok(now)
    }

    // -------------------------------------------------------------------------
    // Payment split
    // -------------------------------------------------------------------------

    pub fn add_payment_entry(&mut self) -> BillingResult<()> {
        self.ensure_editable()?;
        self.payments.add_entry();
        self.refresh();
        Ok(())
    }

    pub fn set_payment_method(&mut self, index: usize, method: PaymentMethod) -> BillingResult<()> {
        self.ensure_editable()?;
        self.payments.set_method(index, method)?;
        self.refresh();
        Ok(())
    }

    pub fn set_payment_amount(&mut self, index: usize, amount: Money) -> BillingResult<()> {
        self.ensure_editable()?;
        self.payments.set_amount(index, amount)?;
        self.refresh();
        Ok(())
    }

    pub fn remove_payment_entry(&mut self, index: usize) -> BillingResult<()> {
        self.ensure_editable()?;
        self.payments.remove_entry(index)?;
        self.refresh();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Validates the bill and freezes a [`CheckoutDraft`], marking the
    /// register as checkout-pending so a second submission is rejected
    /// while the settlement delay runs.
    ///
    /// ## Validation order
    /// 1. no checkout already pending (`CheckoutInProgress`)
    /// 2. a client is selected (`NoClientSelected`)
    /// 3. the cart is non-empty (`EmptyCart`)
    /// 4. payments sum to the grand total exactly (`PaymentMismatch`)
    ///
    /// A rejection leaves the register untouched.
    pub fn begin_checkout(&mut self) -> BillingResult<CheckoutDraft> {
        if self.checkout_pending {
            return Err(BillingError::CheckoutInProgress);
        }
        let client = self.client.clone().ok_or(BillingError::NoClientSelected)?;
        if self.cart.is_empty() {
            return Err(BillingError::EmptyCart);
        }
        let totals = self.totals();
        self.payments.check_balanced(totals.grand_total)?;

        self.checkout_pending = true;

        Ok(CheckoutDraft {
            client,
            cart: self.cart.clone(),
            totals,
            payments: self.payments.clone(),
            discounts: self.discounts.clone(),
            redemption: self.redemption,
        })
    }

    /// Returns to Building after a failed settlement, bill untouched.
    pub fn abort_checkout(&mut self) {
        self.checkout_pending = false;
    }

    /// Completes a successful checkout: the register resets for the next
    /// transaction.
    pub fn complete_checkout(&mut self) {
        self.reset_bill();
    }

    /// Abandons the in-progress bill (explicit staff action). Not
    /// available while a checkout is settling.
    pub fn start_new_bill(&mut self) -> BillingResult<()> {
        self.ensure_editable()?;
        self.reset_bill();
        Ok(())
    }

    /// Clears cart, client, discounts, redemptions, and payments; back to
    /// Idle.
    pub fn reset_bill(&mut self) {
        self.client = None;
        self.cart.clear();
        self.discounts.clear();
        self.redemption.clear();
        self.payments.reset();
        self.checkout_pending = false;
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    /// Runs after every mutation, in this order:
    /// 1. clamp points back under the (possibly shrunken) points cap
    /// 2. clamp wallet under its cap, computed with the clamped points
    /// 3. auto-sync the single payment entry to the new grand total
    fn refresh(&mut self) {
        let points_cap = self.points_cap();
        self.redemption.points_redeemed = self.redemption.points_redeemed.min(points_cap);

        let wallet_cap = self.wallet_cap();
        self.redemption.wallet_redeemed = self.redemption.wallet_redeemed.min(wallet_cap);

        let totals = self.totals();
        self.payments.sync_to_total(totals.grand_total);
    }
}

// =============================================================================
// Tauri-managed wrapper
// =============================================================================

/// Tauri-managed register state.
///
/// `Arc<Mutex<Register>>`: commands run concurrently, and every register
/// mutation (including its refresh pass) must be observed atomically.
#[derive(Debug)]
pub struct RegisterState {
    register: Arc<Mutex<Register>>,
}

impl RegisterState {
    /// Creates an idle register with the given tax rate.
    pub fn new(tax_rate: TaxRate) -> Self {
        RegisterState {
            register: Arc::new(Mutex::new(Register::new(tax_rate))),
        }
    }

    /// Executes a function with read access to the register.
    pub fn with_register<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Register) -> R,
    {
        let register = self.register.lock().expect("Register mutex poisoned");
        f(&register)
    }

    /// Executes a function with write access to the register.
    pub fn with_register_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Register) -> R,
    {
        let mut register = self.register.lock().expect("Register mutex poisoned");
        f(&mut register)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use salon_core::types::ItemKind;

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

    fn test_client(loyalty_rupees: i64, wallet_rupees: i64) -> Client {
        Client {
            id: "c1".to_string(),
            name: "Asha".to_string(),
            phone: "9876512345".to_string(),
            loyalty_points_paise: loyalty_rupees * 100,
            wallet_balance_paise: wallet_rupees * 100,
            packages: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn register_with_bill() -> Register {
        let mut register = Register::new(TaxRate::from_bps(1800));
        register.select_client(test_client(0, 0)).unwrap();
        register.add_item(&test_item("1", 600)).unwrap();
        register
    }

    #[test]
    fn test_single_payment_follows_total() {
        let mut register = register_with_bill();

        // ₹600 + 18% = ₹708, auto-synced onto the single entry.
        assert_eq!(
            register.payments().entries[0].amount,
            Money::from_rupees(708)
        );

        // Add another service: total moves, entry follows.
        register.add_item(&test_item("2", 400)).unwrap();
        assert_eq!(
            register.payments().entries[0].amount,
            Money::from_rupees(1180)
        );
    }

    #[test]
    fn test_auto_sync_stops_on_split() {
        let mut register = register_with_bill();
        register.add_payment_entry().unwrap();
        register
            .set_payment_amount(0, Money::from_rupees(500))
            .unwrap();

        register.add_item(&test_item("2", 400)).unwrap();

        // Neither entry chased the new total.
        assert_eq!(
            register.payments().entries[0].amount,
            Money::from_rupees(500)
        );
        assert_eq!(register.payments().entries[1].amount, Money::zero());
    }

    #[test]
    fn test_redemption_reclamps_when_cart_shrinks() {
        let mut register = Register::new(TaxRate::zero());
        register.select_client(test_client(1000, 0)).unwrap();
        register.add_item(&test_item("1", 600)).unwrap();
        register.add_item(&test_item("2", 400)).unwrap();

        register.toggle_points().unwrap();
        assert_eq!(
            register.redemption().points_redeemed,
            Money::from_rupees(1000)
        );

        // Remove the ₹600 line: cap shrinks to ₹400, redemption follows.
        register.remove_line(0).unwrap();
        assert_eq!(
            register.redemption().points_redeemed,
            Money::from_rupees(400)
        );
        assert_eq!(register.totals().grand_total, Money::zero());
    }

    #[test]
    fn test_clear_client_drops_redemptions() {
        let mut register = Register::new(TaxRate::zero());
        register.select_client(test_client(500, 0)).unwrap();
        register.add_item(&test_item("1", 600)).unwrap();
        register.toggle_points().unwrap();

        register.clear_client().unwrap();
        assert_eq!(register.redemption().points_redeemed, Money::zero());
    }

    #[test]
    fn test_toggle_points_requires_client() {
        let mut register = Register::new(TaxRate::zero());
        register.add_item(&test_item("1", 600)).unwrap();

        assert!(matches!(
            register.toggle_points(),
            Err(BillingError::NoClientSelected)
        ));
    }

    #[test]
    fn test_set_points_respects_cap() {
        let mut register = Register::new(TaxRate::zero());
        register.select_client(test_client(450, 0)).unwrap();
        register.add_item(&test_item("1", 600)).unwrap();

        // Partial amounts are allowed up to the cap.
        register.set_points(Money::from_rupees(200)).unwrap();
        assert_eq!(
            register.redemption().points_redeemed,
            Money::from_rupees(200)
        );

        let err = register.set_points(Money::from_rupees(451)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidRedemptionAmount { .. }));
    }

    #[test]
    fn test_wallet_cap_sees_points_first() {
        let mut register = Register::new(TaxRate::zero());
        register.select_client(test_client(400, 1000)).unwrap();
        register.add_item(&test_item("1", 600)).unwrap();

        register.toggle_points().unwrap(); // ₹400
        assert_eq!(register.wallet_cap(), Money::from_rupees(200));

        register.toggle_wallet().unwrap();
        assert_eq!(
            register.redemption().wallet_redeemed,
            Money::from_rupees(200)
        );
        assert_eq!(register.totals().grand_total, Money::zero());
    }

    #[test]
    fn test_begin_checkout_validation_order() {
        let mut register = Register::new(TaxRate::from_bps(1800));

        // No client first.
        register.add_item(&test_item("1", 600)).unwrap();
        assert!(matches!(
            register.begin_checkout(),
            Err(BillingError::NoClientSelected)
        ));

        // Client but empty cart.
        register.reset_bill();
        register.select_client(test_client(0, 0)).unwrap();
        assert!(matches!(
            register.begin_checkout(),
            Err(BillingError::EmptyCart)
        ));

        // Payment mismatch: split tender short by ₹8 against ₹708.
        register.add_item(&test_item("1", 600)).unwrap();
        register.add_payment_entry().unwrap();
        register
            .set_payment_amount(0, Money::from_rupees(500))
            .unwrap();
        register
            .set_payment_amount(1, Money::from_rupees(200))
            .unwrap();
        let err = register.begin_checkout().unwrap_err();
        assert_eq!(err.shortfall(), Some(Money::from_rupees(8)));
    }

    #[test]
    fn test_double_checkout_rejected_while_pending() {
        let mut register = register_with_bill();

        let draft = register.begin_checkout().unwrap();
        assert_eq!(draft.totals.grand_total, Money::from_rupees(708));

        assert!(matches!(
            register.begin_checkout(),
            Err(BillingError::CheckoutInProgress)
        ));

        // Abort returns to Building with the bill intact.
        register.abort_checkout();
        assert!(!register.is_checkout_pending());
        assert_eq!(register.cart().line_count(), 1);
        assert!(register.begin_checkout().is_ok());
    }

    #[test]
    fn test_mutations_blocked_while_pending() {
        let mut register = register_with_bill();
        register.begin_checkout().unwrap();

        assert!(matches!(
            register.add_item(&test_item("2", 400)),
            Err(BillingError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.clear_client(),
            Err(BillingError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.start_new_bill(),
            Err(BillingError::CheckoutInProgress)
        ));

        register.abort_checkout();
        register.start_new_bill().unwrap();
        assert!(register.cart().is_empty());
    }

    #[test]
    fn test_draft_is_frozen_against_later_mutation() {
        let mut register = register_with_bill();
        let draft = register.begin_checkout().unwrap();

        register.abort_checkout();
        register.add_item(&test_item("2", 400)).unwrap();

        assert_eq!(draft.cart.line_count(), 1);
        assert_eq!(draft.totals.grand_total, Money::from_rupees(708));
    }

    #[test]
    fn test_complete_checkout_resets() {
        let mut register = register_with_bill();
        register.begin_checkout().unwrap();

        register.complete_checkout();
        assert!(register.client().is_none());
        assert!(register.cart().is_empty());
        assert_eq!(register.payments().entries.len(), 1);
        assert_eq!(register.payments().entries[0].amount, Money::zero());
        assert!(!register.is_checkout_pending());
    }

    #[test]
    fn test_manual_discount_validated() {
        let mut register = register_with_bill();

        assert!(register
            .set_manual_discount(Discount::Percentage(10001))
            .is_err());
        register
            .set_manual_discount(Discount::Fixed(Money::from_rupees(100)))
            .unwrap();

        // ₹600 - ₹100 = ₹500 base, ₹90 tax: payment entry follows to ₹590.
        assert_eq!(
            register.payments().entries[0].amount,
            Money::from_rupees(590)
        );
    }
}
