//! # Payment Split Reconciler
//!
//! Maintains the list of (method, amount) tender entries for the bill and
//! checks their sum against the grand total before checkout is permitted.
//!
//! ## Auto-Sync Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One entry:   amount follows grand_total automatically                  │
//! │               (the common single-tender case stays frictionless)       │
//! │                                                                         │
//! │  Two+ entries: amounts are entered manually; the mismatch is           │
//! │                surfaced until the sum is exact                         │
//! │                                                                         │
//! │  The auto-sync stops the INSTANT a second entry is added.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are integer paise, so the checkout equality check is exact:
//! no floating-point drift can block or falsely pass a split payment.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{BillingError, BillingResult};
use crate::money::Money;
use crate::types::PaymentMethod;

// =============================================================================
// Payment Entry
// =============================================================================

/// One tender entry on the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub method: PaymentMethod,
    pub amount: Money,
}

impl PaymentEntry {
    /// A fresh entry: online/UPI, zero amount.
    pub fn new() -> Self {
        PaymentEntry {
            method: PaymentMethod::default(),
            amount: Money::zero(),
        }
    }
}

impl Default for PaymentEntry {
    fn default() -> Self {
        PaymentEntry::new()
    }
}

// =============================================================================
// Payment Split
// =============================================================================

/// The split-payment ledger.
///
/// ## Invariant
/// At least one entry always exists. Removing the last remaining entry is
/// rejected.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSplit {
    pub entries: Vec<PaymentEntry>,
}

impl PaymentSplit {
    /// Creates a split with a single zeroed entry.
    pub fn new() -> Self {
        PaymentSplit {
            entries: vec![PaymentEntry::new()],
        }
    }

    /// Appends a new entry defaulted to `{online, 0}`.
    ///
    /// Adding a second entry also ends the single-entry auto-sync: from
    /// here on all amounts are manual.
    pub fn add_entry(&mut self) {
        self.entries.push(PaymentEntry::new());
    }

    /// Sets one entry's method.
    pub fn set_method(&mut self, index: usize, method: PaymentMethod) -> BillingResult<()> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(BillingError::LineNotFound { index })?;
        entry.method = method;
        Ok(())
    }

    /// Sets one entry's amount. Negative amounts are rejected.
    pub fn set_amount(&mut self, index: usize, amount: Money) -> BillingResult<()> {
        if amount.is_negative() {
            return Err(crate::error::ValidationError::MustBeNonNegative {
                field: "payment amount".to_string(),
            }
            .into());
        }
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(BillingError::LineNotFound { index })?;
        entry.amount = amount;
        Ok(())
    }

    /// Removes an entry, unless it is the last remaining one.
    pub fn remove_entry(&mut self, index: usize) -> BillingResult<()> {
        if index >= self.entries.len() {
            return Err(BillingError::LineNotFound { index });
        }
        if self.entries.len() == 1 {
            return Err(BillingError::LastPaymentEntry);
        }
        self.entries.remove(index);
        Ok(())
    }

    /// Keeps the single-tender case in step with the bill: when exactly
    /// one entry exists its amount is overwritten to the new grand total.
    /// With two or more entries this is a no-op.
    pub fn sync_to_total(&mut self, grand_total: Money) {
        if self.entries.len() == 1 {
            self.entries[0].amount = grand_total;
        }
    }

    /// Sum of all entry amounts.
    pub fn total_paid(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Signed difference `grand_total - total_paid`: positive while money
    /// is still owed, negative on overpayment, zero when exact.
    pub fn remaining(&self, grand_total: Money) -> Money {
        grand_total - self.total_paid()
    }

    /// The checkout gate: entries must sum to the grand total EXACTLY.
    /// Any deviation, even one paisa, rejects with the precise mismatch.
    pub fn check_balanced(&self, grand_total: Money) -> BillingResult<()> {
        let paid = self.total_paid();
        if paid != grand_total {
            return Err(BillingError::PaymentMismatch {
                expected: grand_total,
                paid,
            });
        }
        Ok(())
    }

    /// Back to a fresh single zeroed entry (new bill).
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(PaymentEntry::new());
    }
}

impl Default for PaymentSplit {
    fn default() -> Self {
        PaymentSplit::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_single_zero_entry() {
        let split = PaymentSplit::new();
        assert_eq!(split.entries.len(), 1);
        assert_eq!(split.entries[0].method, PaymentMethod::Upi);
        assert_eq!(split.entries[0].amount, Money::zero());
    }

    #[test]
    fn test_single_entry_auto_sync() {
        let mut split = PaymentSplit::new();

        split.sync_to_total(Money::from_rupees(708));
        assert_eq!(split.entries[0].amount, Money::from_rupees(708));

        // Total changes, single entry follows.
        split.sync_to_total(Money::from_rupees(590));
        assert_eq!(split.entries[0].amount, Money::from_rupees(590));
    }

    #[test]
    fn test_auto_sync_stops_with_second_entry() {
        let mut split = PaymentSplit::new();
        split.sync_to_total(Money::from_rupees(708));

        split.add_entry();
        split.sync_to_total(Money::from_rupees(900));

        // Neither entry was touched.
        assert_eq!(split.entries[0].amount, Money::from_rupees(708));
        assert_eq!(split.entries[1].amount, Money::zero());
    }

    #[test]
    fn test_split_payment_balances() {
        // {cash 500, card 208} against 708 passes.
        let mut split = PaymentSplit::new();
        split.set_method(0, PaymentMethod::Cash).unwrap();
        split.set_amount(0, Money::from_rupees(500)).unwrap();
        split.add_entry();
        split.set_method(1, PaymentMethod::Card).unwrap();
        split.set_amount(1, Money::from_rupees(208)).unwrap();

        assert!(split.check_balanced(Money::from_rupees(708)).is_ok());

        // Changing card to 200 blocks with remaining ₹8.
        split.set_amount(1, Money::from_rupees(200)).unwrap();
        let err = split.check_balanced(Money::from_rupees(708)).unwrap_err();
        assert_eq!(err.shortfall(), Some(Money::from_rupees(8)));
    }

    #[test]
    fn test_one_paisa_off_rejects() {
        let mut split = PaymentSplit::new();
        split.set_amount(0, Money::from_paise(70799)).unwrap();

        assert!(split.check_balanced(Money::from_paise(70800)).is_err());

        split.set_amount(0, Money::from_paise(70800)).unwrap();
        assert!(split.check_balanced(Money::from_paise(70800)).is_ok());
    }

    #[test]
    fn test_overpayment_rejects_too() {
        let mut split = PaymentSplit::new();
        split.set_amount(0, Money::from_rupees(710)).unwrap();

        let err = split.check_balanced(Money::from_rupees(708)).unwrap_err();
        assert_eq!(err.shortfall(), Some(Money::from_rupees(-2)));
    }

    #[test]
    fn test_cannot_remove_last_entry() {
        let mut split = PaymentSplit::new();
        assert!(matches!(
            split.remove_entry(0),
            Err(BillingError::LastPaymentEntry)
        ));

        split.add_entry();
        split.remove_entry(1).unwrap();
        assert_eq!(split.entries.len(), 1);
    }

    #[test]
    fn test_set_amount_rejects_negative() {
        let mut split = PaymentSplit::new();
        assert!(split.set_amount(0, Money::from_paise(-100)).is_err());
    }

    #[test]
    fn test_bad_index() {
        let mut split = PaymentSplit::new();
        assert!(split.set_method(5, PaymentMethod::Cash).is_err());
        assert!(split.set_amount(5, Money::zero()).is_err());
        assert!(split.remove_entry(5).is_err());
    }

    #[test]
    fn test_remaining() {
        let mut split = PaymentSplit::new();
        split.set_amount(0, Money::from_rupees(500)).unwrap();

        assert_eq!(
            split.remaining(Money::from_rupees(708)),
            Money::from_rupees(208)
        );
    }

    #[test]
    fn test_reset() {
        let mut split = PaymentSplit::new();
        split.set_amount(0, Money::from_rupees(500)).unwrap();
        split.add_entry();

        split.reset();
        assert_eq!(split.entries.len(), 1);
        assert_eq!(split.entries[0].amount, Money::zero());
    }
}
