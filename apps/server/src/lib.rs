//! # Resto POS Server
//!
//! HTTP JSON API for a small restaurant POS: authentication, the per-day
//! shift register, and order checkout.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Resto POS Server                                 │
//! │                                                                         │
//! │  Cashier SPA ───► HTTP/JSON (4000) ───► routes ───► resto-db ─► SQLite  │
//! │                        │                   │                            │
//! │                        │                   └──► resto-core (pure math)  │
//! │                        ▼                                                │
//! │                  auth (JWT + argon2)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The library surface exists so integration tests can build the router
//! against an in-memory database without binding a socket.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

use axum::Router;

/// Builds the application router for the given state.
pub fn app(state: AppState) -> Router {
    routes::router(state)
}
