//! # resto-core: Pure Business Logic for Resto POS
//!
//! This crate is the **heart** of Resto POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Resto POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Cashier SPA (external)                          │   │
//! │  │    Cart builder ──► Payment dialog ──► Receipt renderer         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON + bearer token               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/server (axum handlers)                     │   │
//! │  │    /shift-registers/*, /orders, /auth/*                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ resto-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │ShiftRecord│  │   Money   │  │  settle   │  │   rules   │  │   │
//! │  │   │   Order   │  │ integer   │  │ cash cap  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 resto-db (Database Layer)                       │   │
//! │  │        SQLite repositories, migrations, atomic increments       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ShiftRecord, Order, BusinessDay, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - Settlement math: change, net cash, cash-like tags
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - same input = same output
//! 2. **No Clock**: the business day is always an explicit parameter,
//!    resolved once at the HTTP boundary; tests inject any date
//! 3. **Integer Money**: all monetary values are i64 minor units
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use resto_core::checkout::settle;
//! use resto_core::money::Money;
//!
//! let total = Money::from_cents(20000);
//! let paid = Money::from_cents(25000);
//!
//! let s = settle(total, Some(paid), Some("cash"));
//! assert_eq!(s.change.cents(), 5000);
//! assert_eq!(s.net_cash.cents(), 20000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use resto_core::Money` instead of
// `use resto_core::money::Money`

pub use checkout::{compute_total, is_cash_like, settle, Settlement};
pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed on a single order.
///
/// ## Business Reason
/// Prevents runaway carts and keeps receipts printable. Can be made
/// configurable per deployment later.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum unit price of a single line item, in minor currency units
/// (Rp 100 billion).
///
/// ## Business Reason
/// Catches fat-fingered prices. Also keeps a full cart's total
/// (`MAX_ORDER_ITEMS × MAX_LINE_QUANTITY × MAX_LINE_PRICE`) well inside
/// the i64 range, so validated input can never reach saturation.
pub const MAX_LINE_PRICE: i64 = 100_000_000_000;
