//! # API Error Type
//!
//! Unified error type for Tauri commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Salon POS                              │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  invoke('checkout')                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command Function: Result<T, ApiError>                                  │
//! │         │                                                               │
//! │         ├── DbError      ──► ApiError { code, message }                 │
//! │         ├── BillingError ──► ApiError { code, message }                 │
//! │         └── Success      ──► T                                          │
//! │                                                                         │
//! │  try { await invoke('checkout') }                                       │
//! │  catch (e) {                                                            │
//! │    // e.message = "Payments total ₹700.00 but the bill is ₹708.00"      │
//! │    // e.code = "PAYMENT_MISMATCH"                                       │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every billing error is a recoverable, user-facing validation state:
//! the frontend shows an inline message or disables an action, never a
//! crash screen.
//!
//! ## Tauri Error Serialization
//! Tauri requires errors to be serializable. We implement `Serialize`
//! and include both a machine-readable `code` and human-readable `message`.

use serde::Serialize;

use salon_core::BillingError;
use salon_db::DbError;

/// API error returned from Tauri commands.
///
/// ## Serialization
/// This is what the frontend receives when a command fails:
/// ```json
/// {
///   "code": "PAYMENT_MISMATCH",
///   "message": "Payments total ₹700.00 but the bill is ₹708.00"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await invoke('apply_voucher_code', { code });
/// } catch (e) {
///   switch (e.code) {
///     case 'INVALID_VOUCHER':
///       showInlineError('Voucher not recognized');
///       break;
///     case 'PAYMENT_MISMATCH':
///       showRemaining(e.message);
///       break;
///     default:
///       showError('An error occurred');
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// Cart ledger operation failed
    CartError,

    /// Voucher code lookup failed
    InvalidVoucher,

    /// Redemption above the permitted cap
    InvalidRedemption,

    /// Payment split problem (mismatch, last-entry removal)
    PaymentMismatch,

    /// Checkout precondition failed or checkout already pending
    CheckoutError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::CorruptDocument(e) => {
                tracing::error!("Corrupt stored document: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored record is unreadable")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts billing errors to API errors.
///
/// The message text comes from the error itself (thiserror Display);
/// the mapping here only picks the machine-readable code.
impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        let code = match &err {
            BillingError::LineNotFound { .. }
            | BillingError::CartTooLarge { .. }
            | BillingError::QuantityTooLarge { .. } => ErrorCode::CartError,

            BillingError::EmptyCart
            | BillingError::NoClientSelected
            | BillingError::CheckoutInProgress => ErrorCode::CheckoutError,

            BillingError::PaymentMismatch { .. } | BillingError::LastPaymentEntry => {
                ErrorCode::PaymentMismatch
            }

            BillingError::InvalidVoucherCode(_) => ErrorCode::InvalidVoucher,

            BillingError::InvalidRedemptionAmount { .. } => ErrorCode::InvalidRedemption,

            BillingError::Validation(_) => ErrorCode::ValidationError,
        };

        ApiError::new(code, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use salon_core::Money;

    #[test]
    fn test_payment_mismatch_carries_amounts() {
        let err: ApiError = BillingError::PaymentMismatch {
            expected: Money::from_rupees(708),
            paid: Money::from_rupees(700),
        }
        .into();

        assert!(matches!(err.code, ErrorCode::PaymentMismatch));
        assert!(err.message.contains("₹708.00"));
        assert!(err.message.contains("₹700.00"));
    }

    #[test]
    fn test_voucher_miss_maps_to_invalid_voucher() {
        let err: ApiError = BillingError::InvalidVoucherCode("NOPE".to_string()).into();
        assert!(matches!(err.code, ErrorCode::InvalidVoucher));
        assert!(err.message.contains("NOPE"));
    }

    #[test]
    fn test_db_not_found_maps() {
        let err: ApiError = DbError::not_found("Client", "c1").into();
        assert!(matches!(err.code, ErrorCode::NotFound));
    }
}
