//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A till balance drifting by fractions of a rupiah over a day of        │
//! │  checkouts is exactly the kind of bug a cash reconciliation exists     │
//! │  to catch, so the reconciliation itself must never introduce it.       │
//! │                                                                         │
//! │  OUR SOLUTION: integer minor units (whole rupiah)                      │
//! │  The database, calculations, and API all use the same i64 values.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use resto_core::money::Money;
//!
//! let price = Money::from_cents(15000); // Rp 15.000
//! let line = price * 2;                 // Rp 30.000
//! assert_eq!(line.cents(), 30000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// For an Indonesian rupiah deployment the minor unit is one rupiah, so
/// `Money::from_cents(50000)` is Rp 50.000. The names follow the convention of
/// "cents" as the generic smallest unit regardless of currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values represent shortfalls in close-of-day
///   variance math, even though checkout only ever produces non-negative ones
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as a bare JSON number**: `Money(50000)` → `50000` on the wire
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor currency units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor currency units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Saturates at the i64 bounds instead of wrapping; an out-of-range
    /// product can therefore never flip sign and turn a total negative.
    /// Validation bounds keep real carts far away from saturation.
    ///
    /// ## Example
    /// ```rust
    /// use resto_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(10000);
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 20000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Saturating subtraction clamped at zero.
    ///
    /// The workhorse of settlement math: `paid.saturating_sub_floor(total)`
    /// is the change owed, and never goes negative on underpayment.
    ///
    /// ## Example
    /// ```rust
    /// use resto_core::money::Money;
    ///
    /// let paid = Money::from_cents(25000);
    /// let total = Money::from_cents(20000);
    /// assert_eq!(paid.saturating_sub_floor(total).cents(), 5000);
    /// assert_eq!(total.saturating_sub_floor(paid).cents(), 0);
    /// ```
    #[inline]
    pub fn saturating_sub_floor(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// The smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable rupiah format
/// with dot thousand separators: `Rp 50.000`.
///
/// ## Note
/// This is for logs and receipts in tests. The wire format is always the
/// bare integer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}Rp {}", sign, grouped)
    }
}

/// Addition of two Money values. Saturating, like all Money arithmetic.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(15000);
        assert_eq!(money.cents(), 15000);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(format!("{}", Money::from_cents(0)), "Rp 0");
        assert_eq!(format!("{}", Money::from_cents(500)), "Rp 500");
        assert_eq!(format!("{}", Money::from_cents(25000)), "Rp 25.000");
        assert_eq!(format!("{}", Money::from_cents(1250000)), "Rp 1.250.000");
        assert_eq!(format!("{}", Money::from_cents(-5000)), "-Rp 5.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(10000);
        let b = Money::from_cents(5000);

        assert_eq!((a + b).cents(), 15000);
        assert_eq!((a - b).cents(), 5000);
        assert_eq!((a * 3).cents(), 30000);
    }

    #[test]
    fn test_saturating_sub_floor() {
        let paid = Money::from_cents(100000);
        let total = Money::from_cents(50000);

        assert_eq!(paid.saturating_sub_floor(total).cents(), 50000);
        // Underpayment never produces negative change
        assert_eq!(total.saturating_sub_floor(paid).cents(), 0);
        assert_eq!(total.saturating_sub_floor(total).cents(), 0);
    }

    #[test]
    fn test_extreme_values_saturate_instead_of_wrapping() {
        // An absurd unit price must never wrap into a negative total
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(3).cents(), i64::MAX);
        assert_eq!((huge + huge + huge).cents(), i64::MAX);
        assert!(!huge.multiply_quantity(999).is_negative());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Money::from_cents(50000)).unwrap();
        assert_eq!(json, "50000");

        let back: Money = serde_json::from_str("25000").unwrap();
        assert_eq!(back.cents(), 25000);
    }
}
