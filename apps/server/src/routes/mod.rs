//! # HTTP Routes
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Route Map                                     │
//! │                                                                         │
//! │  GET    /health                  liveness probe            (public)     │
//! │  POST   /auth/login              credentials → token       (public)     │
//! │  POST   /auth/register           create staff account      (admin)      │
//! │                                                                         │
//! │  GET    /shift-registers/today   today's shift record      (bearer)     │
//! │  POST   /shift-registers/open    record opening balance    (bearer)     │
//! │  POST   /shift-registers/close   close with counted cash   (bearer)     │
//! │                                                                         │
//! │  POST   /orders                  checkout                  (bearer)     │
//! │  GET    /orders                  list / search             (bearer)     │
//! │  GET    /orders/{id}             fetch one                 (bearer)     │
//! │  DELETE /orders/{id}             remove from history       (bearer)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod health;
pub mod orders;
pub mod shifts;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use resto_core::BusinessDay;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/shift-registers/today", get(shifts::today))
        .route("/shift-registers/open", post(shifts::open))
        .route("/shift-registers/close", post(shifts::close))
        .route("/orders", post(orders::checkout).get(orders::list))
        .route("/orders/{id}", get(orders::get_by_id).delete(orders::remove))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolves "today" from the server's local clock.
///
/// This is the only place the wall clock turns into a [`BusinessDay`]:
/// shift-open and checkout both go through it, so one request can never
/// land on a different day than the shift gate checks.
pub(crate) fn business_day_now() -> BusinessDay {
    BusinessDay::from_date(chrono::Local::now().date_naive())
}
