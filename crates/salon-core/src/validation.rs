//! # Validation Module
//!
//! Input validation utilities for Salon POS.
//!
//! Validation happens in layers: the frontend gives immediate feedback,
//! the command layer (this module) enforces business limits, and the
//! database schema backs both with constraints. Each layer catches what the
//! previous one missed.
//!
//! ## Usage
//! ```rust
//! use salon_core::validation::{validate_quantity, validate_voucher_code};
//!
//! validate_quantity(5).unwrap();
//! validate_voucher_code("WELCOME50").unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a voucher code before lookup.
///
/// ## Rules
/// - Must not be empty
/// - At most 30 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_voucher_code;
///
/// assert!(validate_voucher_code("WELCOME50").is_ok());
/// assert!(validate_voucher_code("").is_err());
/// assert!(validate_voucher_code("has space").is_err());
/// ```
pub fn validate_voucher_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "voucher code".to_string(),
        });
    }

    if code.len() > 30 {
        return Err(ValidationError::TooLong {
            field: "voucher code".to_string(),
            max: 30,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "voucher code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_uppercase())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity value.
///
/// ## Rules
/// - Must be positive (> 0); a bill line always represents at least one
///   unit (removal is a separate operation)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary services)
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_price_paise;
///
/// assert!(validate_price_paise(59900).is_ok());  // ₹599.00
/// assert!(validate_price_paise(0).is_ok());      // Complimentary
/// assert!(validate_price_paise(-100).is_err());  // Invalid
/// ```
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a manual discount value.
///
/// ## Rules
/// - Fixed amounts must be >= 0 paise
/// - Percentages must be 0..=10000 bps (0% to 100%)
pub fn validate_discount(discount: &crate::types::Discount) -> ValidationResult<()> {
    match discount {
        crate::types::Discount::Fixed(amount) => {
            if amount.is_negative() {
                return Err(ValidationError::MustBeNonNegative {
                    field: "discount amount".to_string(),
                });
            }
        }
        crate::types::Discount::Percentage(bps) => {
            if *bps > 10000 {
                return Err(ValidationError::OutOfRange {
                    field: "discount percentage".to_string(),
                    min: 0,
                    max: 10000,
                });
            }
        }
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Salon billing in practice uses 0 or 1800 (18% GST)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of bill lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_LINES (100)
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "bill lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
