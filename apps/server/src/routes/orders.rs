//! Order endpoints: checkout, listing, fetch, delete.
//!
//! ## Checkout Orchestration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     POST /orders                                        │
//! │                                                                         │
//! │  1. validate line items / tendered amount     (resto-core)              │
//! │  2. recompute the total, reject mismatches    (resto-core)              │
//! │  3. settle: change + net cash                 (resto-core, pure)        │
//! │  4. transactional checkout                    (resto-db, one txn)       │
//! │       shift gate → order insert → ledger delta                          │
//! │  5. 201 { success, order, change, newBalance }                          │
//! │     (200 when an idempotency key replayed an earlier submission)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use resto_core::{settle, validation, Money, Order, OrderLine, OrderStatus, OrderType};
use resto_db::{NewOrder, OrderFilter};

use crate::auth::AuthenticatedCashier;
use crate::error::ApiResult;
use crate::routes::business_day_now;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<OrderLine>,
    /// Optional cross-check; the server recomputes regardless.
    #[serde(default)]
    pub total: Option<Money>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub payment_received: Option<Money>,
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Client-generated key; resubmitting with the same key replays the
    /// stored order instead of selling twice.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub order: Order,
    pub change: Money,
    /// Till balance after this sale; unchanged (but still reported) when
    /// no cash moved. `null` on idempotent replays.
    pub new_balance: Option<Money>,
}

/// `POST /orders`
///
/// The one write path for sales. Validation and settlement are pure;
/// everything that touches storage happens inside a single resto-db
/// transaction, so a refused sale leaves no trace.
pub async fn checkout(
    cashier: AuthenticatedCashier,
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Response> {
    validation::validate_line_items(&req.items)?;
    validation::validate_payment_received(req.payment_received)?;
    let total = validation::resolve_total(&req.items, req.total)?;

    let order_type = OrderType::from_tag(req.order_type.as_deref());
    let settlement = settle(total, req.payment_received, req.payment_method.as_deref());

    let outcome = state
        .db
        .orders()
        .checkout(NewOrder {
            cashier: cashier.id.clone(),
            cashier_name: Some(cashier.username.clone()),
            business_day: business_day_now(),
            items: req.items,
            total,
            order_type,
            status: OrderStatus::Paid,
            payment_received: req.payment_received,
            payment_method: req.payment_method,
            change: req.payment_received.map(|_| settlement.change),
            net_cash: settlement.net_cash,
            idempotency_key: req.idempotency_key,
        })
        .await?;

    info!(
        cashier = %cashier.username,
        order_id = %outcome.order.id,
        total = %total,
        replayed = outcome.replayed,
        "Checkout"
    );

    let status = if outcome.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let body = CheckoutResponse {
        success: true,
        change: outcome.change,
        new_balance: outcome.new_balance,
        order: outcome.order,
    };

    Ok((status, Json(body)).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Substring search over item names.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// `GET /orders`
///
/// Newest-first history with paging. The `orderType` filter only applies
/// when the tag is a recognized channel; bogus tags would otherwise
/// silently turn into a dine-in filter.
pub async fn list(
    _cashier: AuthenticatedCashier,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let order_type = query
        .order_type
        .as_deref()
        .map(str::trim)
        .filter(|tag| OrderType::from_tag(Some(tag)).as_str() == *tag)
        .map(|tag| OrderType::from_tag(Some(tag)));

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 200);

    let filter = OrderFilter {
        q: query.q.filter(|q| !q.trim().is_empty()),
        order_type,
        page,
        limit,
    };

    let (orders, total) = state.db.orders().list(&filter).await?;

    Ok(Json(ListResponse {
        orders,
        total,
        page,
        limit,
    }))
}

/// `GET /orders/{id}`
pub async fn get_by_id(
    _cashier: AuthenticatedCashier,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    let order = state.db.orders().get_by_id(&id).await?;
    Ok(Json(order))
}

/// `DELETE /orders/{id}`
///
/// History management only: removing an order does not reverse its cash
/// movement on the shift ledger.
pub async fn remove(
    cashier: AuthenticatedCashier,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = state.db.orders().delete(&id).await?;
    if !deleted {
        return Err(crate::error::ApiError::NotFound(format!(
            "Order not found: {id}"
        )));
    }
    info!(cashier = %cashier.username, order_id = %id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}
