//! # Checkout Settlement Math
//!
//! Pure cash-reconciliation arithmetic for order checkout.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (apps/server)                                            │
//! │    │  validate items, normalize order type                             │
//! │    ▼                                                                    │
//! │  compute_total(items) ──► settle(total, paid, method)  ← THIS MODULE   │
//! │    │                         │                                          │
//! │    │                         ▼                                          │
//! │    │                    Settlement { change, net_cash }                 │
//! │    ▼                         │                                          │
//! │  OrderRepository::checkout ◄─┘  (one SQLite transaction:               │
//! │                                  shift lookup → insert → increment)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Cash Cap Rule
//! Cash credited to the till is capped at the order total: overpayment
//! beyond the total is returned as change, never banked; underpayment only
//! credits what was actually received.
//!
//! | total  | paid    | change | net cash |
//! |--------|---------|--------|----------|
//! | 50.000 | 100.000 | 50.000 | 50.000   |
//! | 50.000 | 30.000  | 0      | 30.000   |
//! | 50.000 | 50.000  | 0      | 50.000   |

use crate::money::Money;
use crate::types::OrderLine;

/// Payment-method tags recognized as physically affecting the till,
/// after normalization (lowercase, separators stripped).
///
/// "tunai" is the Indonesian word for cash; "cod" / "cash on delivery"
/// come in from delivery-platform receipts keyed in by hand.
const CASH_SYNONYMS: &[&str] = &["cash", "tunai", "cod", "cashondelivery"];

/// Classifies a payment-method tag as cash-like.
///
/// Matching is case-insensitive and treats hyphens, underscores, and
/// spaces as equivalent, so `"Cash-On-Delivery"`, `"cash_on_delivery"`,
/// and `"COD"` all count. Absent or unrecognized methods are non-cash:
/// they settle off-ledger and must not move the till balance.
pub fn is_cash_like(method: Option<&str>) -> bool {
    let Some(method) = method else {
        return false;
    };

    let normalized: String = method
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect();

    CASH_SYNONYMS.contains(&normalized.as_str())
}

/// Sums line totals: `Σ unit_price × qty`.
pub fn compute_total(items: &[OrderLine]) -> Money {
    items
        .iter()
        .fold(Money::zero(), |acc, line| acc + line.line_total())
}

/// Outcome of settling a payment against an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Change owed to the customer: `max(0, paid − total)`.
    pub change: Money,
    /// Cash credited to the till: `max(0, min(paid, total))` for cash-like
    /// payments, zero otherwise.
    pub net_cash: Money,
}

impl Settlement {
    /// A settlement that moves nothing (non-cash or unpaid orders).
    pub const fn no_op() -> Self {
        Settlement {
            change: Money::zero(),
            net_cash: Money::zero(),
        }
    }
}

/// Settles a payment against an order total.
///
/// With no `payment_received` there is nothing to settle: platform and
/// delivery-aggregator orders settle off-ledger, so the till is untouched
/// and no change is owed.
pub fn settle(total: Money, payment_received: Option<Money>, method: Option<&str>) -> Settlement {
    let Some(paid) = payment_received else {
        return Settlement::no_op();
    };

    let change = paid.saturating_sub_floor(total);

    let net_cash = if is_cash_like(method) {
        // max(0, min(paid, total)), the cash cap rule
        Money::from_cents(paid.min(total).cents().max(0))
    } else {
        Money::zero()
    };

    Settlement { change, net_cash }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: i64, qty: i64) -> OrderLine {
        OrderLine {
            product_id: None,
            name: "item".to_string(),
            price: Money::from_cents(price),
            qty,
        }
    }

    #[test]
    fn test_compute_total() {
        let items = vec![line(10000, 2), line(5000, 1)];
        assert_eq!(compute_total(&items).cents(), 25000);

        assert_eq!(compute_total(&[]).cents(), 0);
    }

    #[test]
    fn test_cash_like_synonyms() {
        assert!(is_cash_like(Some("cash")));
        assert!(is_cash_like(Some("CASH")));
        assert!(is_cash_like(Some("Tunai")));
        assert!(is_cash_like(Some("cod")));
        assert!(is_cash_like(Some("cash-on-delivery")));
        assert!(is_cash_like(Some("cash_on_delivery")));
        assert!(is_cash_like(Some("Cash On Delivery")));
    }

    #[test]
    fn test_non_cash_methods() {
        assert!(!is_cash_like(None));
        assert!(!is_cash_like(Some("qris")));
        assert!(!is_cash_like(Some("card")));
        assert!(!is_cash_like(Some("transfer")));
        assert!(!is_cash_like(Some("")));
        // "cashback" must not match on a prefix
        assert!(!is_cash_like(Some("cashback")));
    }

    #[test]
    fn test_cash_overpayment_caps_net_cash() {
        // overpaid: change covers the excess, the till only banks the total
        let s = settle(
            Money::from_cents(50000),
            Some(Money::from_cents(100000)),
            Some("cash"),
        );
        assert_eq!(s.net_cash.cents(), 50000);
        assert_eq!(s.change.cents(), 50000);
    }

    #[test]
    fn test_cash_underpayment_credits_received() {
        // underpaid: only what was actually received reaches the till
        let s = settle(
            Money::from_cents(50000),
            Some(Money::from_cents(30000)),
            Some("cash"),
        );
        assert_eq!(s.net_cash.cents(), 30000);
        assert_eq!(s.change.cents(), 0);
    }

    #[test]
    fn test_cash_exact_payment() {
        let s = settle(
            Money::from_cents(20000),
            Some(Money::from_cents(20000)),
            Some("tunai"),
        );
        assert_eq!(s.net_cash.cents(), 20000);
        assert_eq!(s.change.cents(), 0);
    }

    #[test]
    fn test_non_cash_is_no_op_on_the_till() {
        // non-cash methods never move the balance; change is still computed
        let s = settle(
            Money::from_cents(20000),
            Some(Money::from_cents(25000)),
            Some("qris"),
        );
        assert_eq!(s.net_cash.cents(), 0);
        assert_eq!(s.change.cents(), 5000);
    }

    #[test]
    fn test_absent_payment_settles_nothing() {
        let s = settle(Money::from_cents(20000), None, Some("cash"));
        assert_eq!(s, Settlement::no_op());
    }
}
