//! # Validation Module
//!
//! Input validation for checkout and shift operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP deserialization (serde)                                 │
//! │  ├── Type checks: numbers are numbers, arrays are arrays               │
//! │  └── Rejects structurally malformed JSON with 400                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Non-empty cart, qty ≥ 1, price ≥ 0                                │
//! │  └── Caller totals cross-checked against recomputation                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE (owner, business_day) - the concurrent-open race           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::checkout::compute_total;
use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::OrderLine;
use crate::{MAX_LINE_PRICE, MAX_LINE_QUANTITY, MAX_ORDER_ITEMS};

// =============================================================================
// Shift Validators
// =============================================================================

/// Validates the opening amount for a new shift.
///
/// ## Rules
/// - Must be ≥ 0 (a till can legitimately open empty)
pub fn validate_opening_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "openingAmount".to_string(),
        });
    }
    Ok(())
}

/// Validates the counted amount for a shift close, when supplied.
pub fn validate_closing_amount(amount: Option<Money>) -> ValidationResult<()> {
    if let Some(amount) = amount {
        if amount.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "closingAmount".to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the line items of a checkout request.
///
/// ## Rules
/// - At least one item, at most [`MAX_ORDER_ITEMS`]
/// - Every item: non-empty name, 0 ≤ price ≤ [`MAX_LINE_PRICE`],
///   1 ≤ qty ≤ [`MAX_LINE_QUANTITY`]
pub fn validate_line_items(items: &[OrderLine]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max: MAX_ORDER_ITEMS,
        });
    }

    for line in items {
        if line.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "items[].name".to_string(),
            });
        }
        if line.price.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "items[].price".to_string(),
            });
        }
        if line.price.cents() > MAX_LINE_PRICE {
            return Err(ValidationError::AmountTooLarge {
                field: "items[].price".to_string(),
                max: Money::from_cents(MAX_LINE_PRICE),
            });
        }
        if line.qty < 1 {
            return Err(ValidationError::MustBePositive {
                field: "items[].qty".to_string(),
            });
        }
        if line.qty > MAX_LINE_QUANTITY {
            return Err(ValidationError::TooMany {
                field: "items[].qty".to_string(),
                max: MAX_LINE_QUANTITY as usize,
            });
        }
    }

    Ok(())
}

/// Validates the tendered amount, when supplied.
pub fn validate_payment_received(amount: Option<Money>) -> ValidationResult<()> {
    if let Some(amount) = amount {
        if amount.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "paymentReceived".to_string(),
            });
        }
    }
    Ok(())
}

/// Resolves the authoritative order total.
///
/// The total is always recomputed from line items. A caller-supplied total
/// is accepted only when it agrees with the recomputation; any mismatch is
/// rejected rather than trusted.
pub fn resolve_total(items: &[OrderLine], supplied: Option<Money>) -> ValidationResult<Money> {
    let computed = compute_total(items);

    match supplied {
        None => Ok(computed),
        Some(total) if total == computed => Ok(computed),
        Some(total) => Err(ValidationError::TotalMismatch {
            supplied: total,
            computed,
        }),
    }
}

// =============================================================================
// User Validators
// =============================================================================

/// Validates a username for account creation.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }
    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, '-', '_', '.'".to_string(),
        });
    }
    Ok(())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.len() < 6 {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: "must be at least 6 characters".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, price: i64, qty: i64) -> OrderLine {
        OrderLine {
            product_id: None,
            name: name.to_string(),
            price: Money::from_cents(price),
            qty,
        }
    }

    #[test]
    fn test_opening_amount() {
        assert!(validate_opening_amount(Money::zero()).is_ok());
        assert!(validate_opening_amount(Money::from_cents(100000)).is_ok());
        assert!(validate_opening_amount(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = validate_line_items(&[]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "items".to_string()
            }
        );
    }

    #[test]
    fn test_line_item_rules() {
        assert!(validate_line_items(&[line("Kopi", 8000, 1)]).is_ok());
        assert!(validate_line_items(&[line("", 8000, 1)]).is_err());
        assert!(validate_line_items(&[line("Kopi", -1, 1)]).is_err());
        assert!(validate_line_items(&[line("Kopi", 8000, 0)]).is_err());
        assert!(validate_line_items(&[line("Kopi", 8000, -2)]).is_err());
        assert!(validate_line_items(&[line("Kopi", 8000, 1000)]).is_err());
    }

    #[test]
    fn test_absurd_price_rejected() {
        let err = validate_line_items(&[line("Kopi", i64::MAX / 2, 3)]).unwrap_err();
        assert!(matches!(err, ValidationError::AmountTooLarge { .. }));

        // The bound itself is still accepted
        assert!(validate_line_items(&[line("Sewa Gedung", MAX_LINE_PRICE, 1)]).is_ok());
    }

    #[test]
    fn test_resolve_total_recomputes() {
        let items = vec![line("A", 10000, 2), line("B", 5000, 1)];

        // No explicit total: the computed one stands
        assert_eq!(resolve_total(&items, None).unwrap().cents(), 25000);

        // Matching caller total accepted
        assert_eq!(
            resolve_total(&items, Some(Money::from_cents(25000)))
                .unwrap()
                .cents(),
            25000
        );

        // Mismatch rejected, never trusted
        let err = resolve_total(&items, Some(Money::from_cents(1000))).unwrap_err();
        assert!(matches!(err, ValidationError::TotalMismatch { .. }));
    }

    #[test]
    fn test_payment_received() {
        assert!(validate_payment_received(None).is_ok());
        assert!(validate_payment_received(Some(Money::zero())).is_ok());
        assert!(validate_payment_received(Some(Money::from_cents(-5))).is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("kasir1").is_ok());
        assert!(validate_username("budi.santoso").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(60)).is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("admin123").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
    }
}
