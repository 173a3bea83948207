//! # Validation Module
//!
//! Input validation for request payloads, run at the API boundary before
//! business logic. Storage constraints (NOT NULL, UNIQUE) back these up at
//! the database layer.
//!
//! ## Usage
//! ```rust
//! use billbook_core::validation::{validate_mobile, validate_quantity};
//! use billbook_core::money::Quantity;
//!
//! validate_mobile("0300-1234567").unwrap();
//! validate_quantity(Quantity::from_milli(2500)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::{Money, Quantity};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum quantity of a single bill line, in thousandths (9999 units).
///
/// Guards against fat-finger entries (typing 10000 instead of 10).
pub const MAX_LINE_QUANTITY_MILLI: i64 = 9_999_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or customer display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a customer mobile number - the ledger's business key.
///
/// ## Rules
/// - Must not be empty
/// - 4 to 20 characters
/// - Digits plus the separators `+ - ( ) space`
pub fn validate_mobile(mobile: &str) -> ValidationResult<()> {
    let mobile = mobile.trim();

    if mobile.is_empty() {
        return Err(ValidationError::Required {
            field: "mobile".to_string(),
        });
    }

    if mobile.len() < 4 || mobile.len() > 20 {
        return Err(ValidationError::OutOfRange {
            field: "mobile".to_string(),
            min: 4,
            max: 20,
        });
    }

    if !mobile
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: "mobile".to_string(),
            reason: "must contain only digits and + - ( ) separators".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address. Deliberately shallow: presence of a single
/// `@` with text on both sides. Real deliverability checks belong to the
/// client and the mail system.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price (cost or sell). Zero is allowed (free items).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a bill-line quantity.
///
/// ## Rules
/// - Must be strictly positive (a zero or negative line is invalid)
/// - Must not exceed [`MAX_LINE_QUANTITY_MILLI`]
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty.milli() > MAX_LINE_QUANTITY_MILLI {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY_MILLI,
        });
    }

    Ok(())
}

/// Validates a bill discount amount. Zero is the common case.
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "discount".to_string(),
        });
    }

    Ok(())
}

/// Validates a partial payment amount.
///
/// Zero is allowed (nothing paid yet, the whole total lands on the
/// customer's balance). Negative payments are rejected.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "amount paid".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Coca-Cola 330ml").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("COKE-330").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("0300-1234567").is_ok());
        assert!(validate_mobile("+92 300 1234567").is_ok());
        assert!(validate_mobile("(021) 1234").is_ok());

        assert!(validate_mobile("").is_err());
        assert!(validate_mobile("123").is_err()); // too short
        assert!(validate_mobile("not-a-number").is_err());
        assert!(validate_mobile(&"1".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@shop.example").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@domain").is_err());
        assert!(validate_email("name@").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Quantity::from_milli(1)).is_ok());
        assert!(validate_quantity(Quantity::from_units(9999)).is_ok());

        assert!(validate_quantity(Quantity::zero()).is_err());
        assert!(validate_quantity(Quantity::from_units(-1)).is_err());
        assert!(validate_quantity(Quantity::from_milli(MAX_LINE_QUANTITY_MILLI + 1)).is_err());
    }

    #[test]
    fn test_validate_price_and_discount() {
        assert!(validate_price("sell price", Money::zero()).is_ok());
        assert!(validate_price("sell price", Money::from_cents(1099)).is_ok());
        assert!(validate_price("sell price", Money::from_cents(-1)).is_err());

        assert!(validate_discount(Money::zero()).is_ok());
        assert!(validate_discount(Money::from_cents(-50)).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        // Zero is a legal partial payment; negative is not
        assert!(validate_payment_amount(Money::zero()).is_ok());
        assert!(validate_payment_amount(Money::from_cents(4000)).is_ok());
        assert!(validate_payment_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
