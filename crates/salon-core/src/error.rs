//! # Error Types
//!
//! Domain-specific error types for salon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salon-core errors (this file)                                         │
//! │  ├── BillingError     - Billing rule violations                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  salon-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Tauri API errors (in app)                                             │
//! │  └── ApiError         - What frontend sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → BillingError → DbError → ApiError → Frontend  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (index, amounts, codes)
//! 3. Errors are enum variants, never String
//! 4. Every variant is a recoverable, user-facing validation state

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Billing Error
// =============================================================================

/// Billing rule violations.
///
/// These errors represent validation failures in the in-progress bill.
/// None of them unwind state: a rejected operation leaves the bill exactly
/// as it was.
#[derive(Debug, Error)]
pub enum BillingError {
    /// A line index does not exist in the cart.
    #[error("No bill line at index {index}")]
    LineNotFound { index: usize },

    /// Cart has exceeded maximum allowed lines.
    #[error("Bill cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout attempted with zero line items.
    #[error("Cannot check out an empty bill")]
    EmptyCart,

    /// Checkout attempted without a selected client.
    #[error("No client selected for this bill")]
    NoClientSelected,

    /// Sum of payment entries does not equal the grand total.
    ///
    /// ## When This Occurs
    /// - Split tender entered manually and off by any amount
    /// - A payment entry edited after totals changed
    ///
    /// The exact difference is carried so the UI can show
    /// "Remaining: ₹X" (or the excess).
    #[error("Payments total {paid} but the bill is {expected}")]
    PaymentMismatch { expected: Money, paid: Money },

    /// Voucher code lookup failed; discount state is untouched.
    #[error("Invalid voucher code: {0}")]
    InvalidVoucherCode(String),

    /// A redemption amount above the computed cap was requested.
    #[error("Redemption of {requested} exceeds the permitted {cap}")]
    InvalidRedemptionAmount { requested: Money, cap: Money },

    /// The last remaining payment entry cannot be removed.
    #[error("At least one payment entry must remain")]
    LastPaymentEntry,

    /// A checkout is already in flight for this bill.
    #[error("Checkout already in progress")]
    CheckoutInProgress,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl BillingError {
    /// For `PaymentMismatch`: the amount still owed (positive) or the
    /// overpayment (negative).
    pub fn shortfall(&self) -> Option<Money> {
        match self {
            BillingError::PaymentMismatch { expected, paid } => Some(*expected - *paid),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before billing logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid voucher code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with BillingError.
pub type BillingResult<T> = Result<T, BillingError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BillingError::PaymentMismatch {
            expected: Money::from_rupees(708),
            paid: Money::from_rupees(700),
        };
        assert_eq!(err.to_string(), "Payments total ₹700.00 but the bill is ₹708.00");
    }

    #[test]
    fn test_payment_mismatch_shortfall() {
        let err = BillingError::PaymentMismatch {
            expected: Money::from_rupees(708),
            paid: Money::from_rupees(700),
        };
        assert_eq!(err.shortfall(), Some(Money::from_rupees(8)));

        let over = BillingError::PaymentMismatch {
            expected: Money::from_rupees(708),
            paid: Money::from_rupees(710),
        };
        assert_eq!(over.shortfall(), Some(Money::from_rupees(-2)));

        assert!(BillingError::EmptyCart.shortfall().is_none());
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "voucher code".to_string(),
        };
        assert_eq!(err.to_string(), "voucher code is required");
    }

    #[test]
    fn test_validation_converts_to_billing_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let billing_err: BillingError = validation_err.into();
        assert!(matches!(billing_err, BillingError::Validation(_)));
    }
}
