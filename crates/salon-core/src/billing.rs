//! # Bill Calculator
//!
//! Pure, deterministic computation from cart + discount/redemption
//! selections + tax rate to a totals breakdown.
//!
//! ## The Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bill Computation Pipeline                           │
//! │                                                                         │
//! │  subtotal ──► - discounts ──► - points ──► - wallet ──► + tax          │
//! │  (Σ lines)    (manual +       (loyalty)    (wallet)     (bps of        │
//! │               promotion +                               taxable base)  │
//! │               voucher)                                                  │
//! │                                                                         │
//! │  Every subtraction clamps at zero. The order is FIXED: reordering      │
//! │  the steps changes the result (each cap is computed against the        │
//! │  balance left by the previous step).                                   │
//! │                                                                         │
//! │  discounts ──► points ──► wallet                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator itself never fails: invalid combinations clamp to zero
//! rather than raising. Redemption caps are enforced where amounts are set
//! (see [`RedemptionSelection`]), not re-validated here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{BillingError, BillingResult};
use crate::money::Money;
use crate::types::{Client, Discount, Promotion, TaxRate, Voucher};

// =============================================================================
// Discount Selection
// =============================================================================

/// The discount sources active on the current bill.
///
/// ## Invariant
/// At most one promotion and one voucher may be active at a time, but
/// manual discount, promotion, and voucher can all be active together.
/// Their contributions are each computed independently against the
/// pre-discount subtotal and SUMMED, never compounded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSelection {
    /// Ad-hoc discount entered by staff at billing time.
    pub manual: Option<Discount>,

    /// The single active catalog promotion, if any.
    pub promotion: Option<Promotion>,

    /// The single voucher attached by code lookup, if any.
    pub voucher: Option<Voucher>,
}

impl DiscountSelection {
    /// Total discount against a subtotal: manual + promotion + voucher
    /// contributions, each derived from the same subtotal.
    ///
    /// The sum is NOT capped at the subtotal; the pipeline clamps the
    /// balance at zero in the next step.
    pub fn total_against(&self, subtotal: Money) -> Money {
        let manual = self
            .manual
            .map(|d| d.amount_against(subtotal))
            .unwrap_or_default();
        let promotion = self
            .promotion
            .as_ref()
            .map(|p| p.discount.amount_against(subtotal))
            .unwrap_or_default();
        let voucher = self
            .voucher
            .as_ref()
            .map(|v| v.discount.amount_against(subtotal))
            .unwrap_or_default();

        manual + promotion + voucher
    }

    /// Selects a promotion; selecting the one already active clears it
    /// (toggle semantics).
    pub fn set_promotion(&mut self, promotion: Promotion) {
        match &self.promotion {
            Some(active) if active.id == promotion.id => self.promotion = None,
            _ => self.promotion = Some(promotion),
        }
    }

    /// Clears the active promotion.
    pub fn clear_promotion(&mut self) {
        self.promotion = None;
    }

    /// Attaches a voucher (replacing any previously attached one).
    pub fn set_voucher(&mut self, voucher: Voucher) {
        self.voucher = Some(voucher);
    }

    /// Detaches the voucher.
    pub fn clear_voucher(&mut self) {
        self.voucher = None;
    }

    /// Drops every discount source.
    pub fn clear(&mut self) {
        self.manual = None;
        self.promotion = None;
        self.voucher = None;
    }
}

// =============================================================================
// Redemption Selection
// =============================================================================

/// Loyalty-point and wallet amounts applied against the current bill.
///
/// Application order is fixed: discounts → points → wallet. Each cap is
/// therefore computed against the balance the previous step left behind.
///
/// Amounts are validated against their caps when SET (the reference
/// behavior trusted the caller and only capped in the UI toggles; setting
/// through [`RedemptionSelection::set_points`]/[`set_wallet`] closes that
/// gap). The data model permits any value up to the cap; the
/// all-or-nothing toggle the UI exposes is a convenience wrapper.
///
/// [`set_wallet`]: RedemptionSelection::set_wallet
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionSelection {
    /// Loyalty points applied, as a currency amount (1 point = ₹1).
    pub points_redeemed: Money,

    /// Wallet balance applied.
    pub wallet_redeemed: Money,
}

/// Maximum loyalty-point redemption for a client on the current bill:
/// `min(loyalty balance, max(0, subtotal - discounts))`.
pub fn max_points_redemption(client: &Client, subtotal: Money, discount_total: Money) -> Money {
    client
        .loyalty_points()
        .min(subtotal.saturating_sub_zero(discount_total))
}

/// Maximum wallet redemption for a client on the current bill. Wallet is
/// applied after points, so the cap subtracts the points already redeemed:
/// `min(wallet balance, max(0, subtotal - discounts - points))`.
pub fn max_wallet_redemption(
    client: &Client,
    subtotal: Money,
    discount_total: Money,
    points_redeemed: Money,
) -> Money {
    client
        .wallet_balance()
        .min(subtotal.saturating_sub_zero(discount_total + points_redeemed))
}

impl RedemptionSelection {
    /// Sets the points amount, rejecting values above the cap or below
    /// zero with [`BillingError::InvalidRedemptionAmount`].
    pub fn set_points(&mut self, amount: Money, cap: Money) -> BillingResult<()> {
        if amount.is_negative() || amount > cap {
            return Err(BillingError::InvalidRedemptionAmount {
                requested: amount,
                cap,
            });
        }
        self.points_redeemed = amount;
        Ok(())
    }

    /// Sets the wallet amount, rejecting values above the cap or below
    /// zero.
    pub fn set_wallet(&mut self, amount: Money, cap: Money) -> BillingResult<()> {
        if amount.is_negative() || amount > cap {
            return Err(BillingError::InvalidRedemptionAmount {
                requested: amount,
                cap,
            });
        }
        self.wallet_redeemed = amount;
        Ok(())
    }

    /// All-or-nothing points toggle: off if currently on, otherwise redeem
    /// the maximum permitted in one step. Returns the new amount.
    pub fn toggle_points(&mut self, cap: Money) -> Money {
        self.points_redeemed = if self.points_redeemed.is_positive() {
            Money::zero()
        } else {
            cap
        };
        self.points_redeemed
    }

    /// All-or-nothing wallet toggle, symmetric with
    /// [`RedemptionSelection::toggle_points`].
    pub fn toggle_wallet(&mut self, cap: Money) -> Money {
        self.wallet_redeemed = if self.wallet_redeemed.is_positive() {
            Money::zero()
        } else {
            cap
        };
        self.wallet_redeemed
    }

    /// Clears both redemptions.
    pub fn clear(&mut self) {
        self.points_redeemed = Money::zero();
        self.wallet_redeemed = Money::zero();
    }
}

// =============================================================================
// Totals
// =============================================================================

/// The derived totals breakdown for a bill.
///
/// Never stored independently of its inputs: recompute with
/// [`compute_totals`] after every cart/discount/redemption change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Σ effective line totals (package-redeemed lines contribute 0).
    pub subtotal: Money,

    /// Manual + promotion + voucher contributions (additive, uncapped).
    pub discount_total: Money,

    /// Amount remaining after discounts and redemptions; tax applies here.
    pub taxable_base: Money,

    /// Tax on the taxable base.
    pub tax: Money,

    /// Taxable base + tax. Never negative.
    pub grand_total: Money,
}

/// Computes the totals breakdown.
///
/// ## Algorithm (fixed order; reordering changes the result)
/// 1. `subtotal` = Σ effective line totals
/// 2. `discount_total` = manual + promotion + voucher, each against
///    `subtotal` independently
/// 3. `after_discount = max(0, subtotal - discount_total)`
/// 4. `after_points = max(0, after_discount - points_redeemed)`
/// 5. `taxable_base = max(0, after_points - wallet_redeemed)`
/// 6. `tax = taxable_base × rate`
/// 7. `grand_total = taxable_base + tax`
///
/// ## Error conditions
/// None. Oversized discounts or redemptions clamp the balance at zero
/// instead of raising: the bill can be consumed entirely but never goes
/// negative. Redemption amounts are trusted as given; their caps are
/// enforced when the amounts are set.
pub fn compute_totals(
    cart: &Cart,
    discounts: &DiscountSelection,
    redemption: &RedemptionSelection,
    tax_rate: TaxRate,
) -> Totals {
    let subtotal = cart.subtotal();
    let discount_total = discounts.total_against(subtotal);

    let after_discount = subtotal.saturating_sub_zero(discount_total);
    let after_points = after_discount.saturating_sub_zero(redemption.points_redeemed);
    let taxable_base = after_points.saturating_sub_zero(redemption.wallet_redeemed);

    let tax = taxable_base.calculate_tax(tax_rate);
    let grand_total = taxable_base + tax;

    Totals {
        subtotal,
        discount_total,
        taxable_base,
        tax,
        grand_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
