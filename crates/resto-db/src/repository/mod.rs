//! # Repository Module
//!
//! Database repository implementations for Resto POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                           │
//! │       │                                                                 │
//! │       │  db.shifts().open(&cashier, day, opening, note)                 │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ShiftRepository                                                        │
//! │  ├── open(&self, owner, day, opening, note)                             │
//! │  ├── get_for_day(&self, owner, day)                                     │
//! │  ├── apply_cash_delta(&self, owner, day, delta)                         │
//! │  └── close(&self, owner, day, closing, note)                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory SQLite)                                     │
//! │  • SQL is isolated in one place                                        │
//! │  • Multi-statement invariants (checkout) live in one transaction       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`shift::ShiftRepository`] - Shift ledger lifecycle and cash deltas
//! - [`order::OrderRepository`] - Orders and the transactional checkout
//! - [`user::UserRepository`] - Staff accounts

pub mod order;
pub mod shift;
pub mod user;
