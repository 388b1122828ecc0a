//! # Domain Types
//!
//! Core domain types used throughout Resto POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ShiftRecord    │   │     Order       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  owner          │   │  items          │   │  id (UUID)      │       │
//! │  │  businessDay    │   │  total          │   │  username       │       │
//! │  │  openingAmount  │   │  orderType      │   │  role           │       │
//! │  │  balance        │   │  cashier        │   │  password_hash  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  BusinessDay    │   │   OrderType     │   │   OrderStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  YYYY-MM-DD     │   │  DineIn (dflt)  │   │  Paid (dflt)    │       │
//! │  │  explicit value,│   │  Takeaway       │   │  Cancelled      │       │
//! │  │  never "now"    │   │  GrabFood, ...  │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Business-Day Rule
//! A [`BusinessDay`] is always an explicit parameter threaded through every
//! call. Resolving "today" from the wall clock happens exactly once, at the
//! HTTP boundary, so tests can inject arbitrary dates and a server/client
//! timezone drift can never split one shift across two records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Cashier Identity
// =============================================================================

/// The authenticated cashier's identifier.
///
/// A single well-typed identity value, attached once at the request boundary.
/// Downstream code never re-derives "who is this" from loose JSON shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashierId(String);

impl CashierId {
    pub fn new(id: impl Into<String>) -> Self {
        CashierId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CashierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CashierId {
    fn from(id: String) -> Self {
        CashierId(id)
    }
}

// =============================================================================
// Business Day
// =============================================================================

/// Calendar-day key scoping one [`ShiftRecord`] per cashier.
///
/// Wire and storage format is `YYYY-MM-DD`. The value is local to the
/// deployment's timezone; shift-open and checkout must derive it from the
/// same clock source (the server's local clock) or a shift silently splits
/// across two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessDay(NaiveDate);

impl BusinessDay {
    pub const fn from_date(date: NaiveDate) -> Self {
        BusinessDay(date)
    }

    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for BusinessDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for BusinessDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(BusinessDay)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "businessDay".to_string(),
                reason: "expected YYYY-MM-DD".to_string(),
            })
    }
}

impl From<NaiveDate> for BusinessDay {
    fn from(date: NaiveDate) -> Self {
        BusinessDay(date)
    }
}

// =============================================================================
// Order Type
// =============================================================================

/// Sales channel for an order.
///
/// Closed enumeration; the three delivery platforms are interchangeable
/// third-party tags. Unrecognized input falls back to dine-in rather than
/// failing the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "dine-in")]
    DineIn,
    #[serde(rename = "takeaway")]
    Takeaway,
    #[serde(rename = "grabfood")]
    GrabFood,
    #[serde(rename = "shopeefood")]
    ShopeeFood,
    #[serde(rename = "gofood")]
    GoFood,
}

impl OrderType {
    /// Normalizes a caller-supplied tag; absent or unrecognized → dine-in.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("dine-in") => OrderType::DineIn,
            Some("takeaway") => OrderType::Takeaway,
            Some("grabfood") => OrderType::GrabFood,
            Some("shopeefood") => OrderType::ShopeeFood,
            Some("gofood") => OrderType::GoFood,
            _ => OrderType::DineIn,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeaway => "takeaway",
            OrderType::GrabFood => "grabfood",
            OrderType::ShopeeFood => "shopeefood",
            OrderType::GoFood => "gofood",
        }
    }
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::DineIn
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle tag of an order.
///
/// Checkout-created orders are `Paid`. `Cancelled` exists so history
/// management can flag an order out of revenue reporting; reporting
/// conventions live with the analytics reader, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("cancelled") => OrderStatus::Cancelled,
            _ => OrderStatus::Paid,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Paid
    }
}

// =============================================================================
// User Role
// =============================================================================

/// Access role carried in the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Cashier,
}

impl Role {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "admin" => Role::Admin,
            _ => Role::Cashier,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
        }
    }
}

// =============================================================================
// Shift Record
// =============================================================================

/// One cash-register record per (cashier, business day).
///
/// ## Lifecycle
/// ```text
/// open ──► OPEN (closed_at unset, accepts cash deltas)
///             │
///             ▼ close
///          CLOSED (closed_at set, rejects further deltas)
/// ```
///
/// `owner`, `business_day` and `opening_amount` are immutable after
/// creation. `balance` mutates only via checkout settlement and may be
/// absent until the first cash sale; readers fall back to the opening
/// amount via [`ShiftRecord::current_balance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRecord {
    pub id: String,
    pub owner: CashierId,
    pub business_day: BusinessDay,
    pub opening_amount: Money,
    /// Running cash-on-hand; `None` until the first cash settlement.
    pub balance: Option<Money>,
    pub note: String,
    /// Counted cash at close. Set together with `closed_at`.
    pub closing_amount: Option<Money>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftRecord {
    /// The effective till balance: stored balance, or the opening amount
    /// when no cash sale has been settled yet.
    #[inline]
    pub fn current_balance(&self) -> Money {
        self.balance.unwrap_or(self.opening_amount)
    }

    /// Whether the shift still accepts cash deltas.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line item on an order.
///
/// Denormalized snapshot: the display name and unit price are frozen at
/// checkout time, so later catalog edits never rewrite sales history. The
/// product reference is optional; free-text items are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "productId", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub name: String,
    /// Unit price in minor currency units.
    pub price: Money,
    /// Quantity, integer ≥ 1.
    pub qty: i64,
}

impl OrderLine {
    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

/// A completed checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderLine>,
    pub total: Money,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub cashier: Option<CashierId>,
    pub cashier_name: Option<String>,
    /// Amount tendered by the customer, when recorded.
    pub payment_received: Option<Money>,
    /// Free-text payment tag; normalized for cash-likeness at settlement.
    pub payment_method: Option<String>,
    /// Change returned at settlement time (receipt data).
    pub change: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A staff account (admin or cashier).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2 hash. Never serialized to the wire.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_day_roundtrip() {
        let day: BusinessDay = "2024-06-01".parse().unwrap();
        assert_eq!(day.to_string(), "2024-06-01");

        assert!("01-06-2024".parse::<BusinessDay>().is_err());
        assert!("2024-6-1x".parse::<BusinessDay>().is_err());
    }

    #[test]
    fn test_business_day_serializes_as_plain_string() {
        let day: BusinessDay = "2024-06-01".parse().unwrap();
        assert_eq!(serde_json::to_string(&day).unwrap(), "\"2024-06-01\"");
    }

    #[test]
    fn test_order_type_fallback() {
        assert_eq!(OrderType::from_tag(Some("takeaway")), OrderType::Takeaway);
        assert_eq!(OrderType::from_tag(Some("gofood")), OrderType::GoFood);
        // unrecognized values fall back to dine-in
        assert_eq!(OrderType::from_tag(Some("bogus")), OrderType::DineIn);
        assert_eq!(OrderType::from_tag(None), OrderType::DineIn);
        assert_eq!(OrderType::from_tag(Some("")), OrderType::DineIn);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::from_tag(None), OrderStatus::Paid);
        assert_eq!(OrderStatus::from_tag(Some("cancelled")), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::from_tag(Some("weird")), OrderStatus::Paid);
    }

    #[test]
    fn test_line_total() {
        let line = OrderLine {
            product_id: None,
            name: "Es Teh".to_string(),
            price: Money::from_cents(5000),
            qty: 3,
        };
        assert_eq!(line.line_total().cents(), 15000);
    }

    #[test]
    fn test_order_line_wire_format() {
        let json = r#"{"name":"Nasi Goreng","price":20000,"qty":2}"#;
        let line: OrderLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.product_id, None);
        assert_eq!(line.price.cents(), 20000);
        assert_eq!(line.qty, 2);
    }

    #[test]
    fn test_current_balance_falls_back_to_opening() {
        let record = ShiftRecord {
            id: "s1".to_string(),
            owner: CashierId::new("u1"),
            business_day: "2024-06-01".parse().unwrap(),
            opening_amount: Money::from_cents(100000),
            balance: None,
            note: String::new(),
            closing_amount: None,
            closed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(record.current_balance().cents(), 100000);
        assert!(record.is_open());

        let mutated = ShiftRecord {
            balance: Some(Money::from_cents(120000)),
            ..record
        };
        assert_eq!(mutated.current_balance().cents(), 120000);
    }

    #[test]
    fn test_user_hash_never_serialized() {
        let user = User {
            id: "u1".to_string(),
            username: "admin".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            display_name: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"username\":\"admin\""));
    }
}
