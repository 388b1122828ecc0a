//! Shift-register endpoints: today's record, open, close.
//!
//! All three operate on the calling cashier's own register for the
//! server-local business day: the identity comes from the bearer token
//! and the day from [`super::business_day_now`], never from the body.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use resto_core::{validation, Money, ShiftRecord};

use crate::auth::AuthenticatedCashier;
use crate::error::{ApiError, ApiResult};
use crate::routes::business_day_now;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub exists: bool,
    /// Today's record, omitted when the shift has not been opened yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ShiftRecord>,
    pub is_open: bool,
}

/// `GET /shift-registers/today`
///
/// Absence is not an error: the UI uses the `exists: false` case to show
/// the "open your register" prompt.
pub async fn today(
    cashier: AuthenticatedCashier,
    State(state): State<AppState>,
) -> ApiResult<Json<TodayResponse>> {
    let day = business_day_now();
    let record = state.db.shifts().get_for_day(&cashier.id, day).await?;
    let is_open = record.as_ref().is_some_and(ShiftRecord::is_open);

    Ok(Json(TodayResponse {
        exists: record.is_some(),
        record,
        is_open,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub opening_amount: Money,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShiftResponse {
    pub success: bool,
    pub record: ShiftRecord,
}

/// `POST /shift-registers/open`
///
/// Records the counted opening balance for today. A second open for the
/// same day answers 409 and leaves the first record untouched.
pub async fn open(
    cashier: AuthenticatedCashier,
    State(state): State<AppState>,
    Json(req): Json<OpenRequest>,
) -> ApiResult<(StatusCode, Json<ShiftResponse>)> {
    validation::validate_opening_amount(req.opening_amount)?;

    let day = business_day_now();
    let record = state
        .db
        .shifts()
        .open(
            &cashier.id,
            day,
            req.opening_amount,
            req.note.as_deref().unwrap_or(""),
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::Conflict(
                    "The shift register is already open for today".to_string(),
                )
            } else {
                e.into()
            }
        })?;

    info!(
        cashier = %cashier.username,
        day = %day,
        opening = %req.opening_amount,
        "Shift opened"
    );
    Ok((
        StatusCode::CREATED,
        Json(ShiftResponse {
            success: true,
            record,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRequest {
    /// Physically counted cash at close, if the cashier recorded it.
    #[serde(default)]
    pub closing_amount: Option<Money>,
    #[serde(default)]
    pub note: Option<String>,
}

/// `POST /shift-registers/close`
///
/// Closing is final; a close against an already-closed register answers
/// 409 rather than the generic precondition failure.
pub async fn close(
    cashier: AuthenticatedCashier,
    State(state): State<AppState>,
    Json(req): Json<CloseRequest>,
) -> ApiResult<Json<ShiftResponse>> {
    validation::validate_closing_amount(req.closing_amount)?;

    let day = business_day_now();
    let record = state
        .db
        .shifts()
        .close(&cashier.id, day, req.closing_amount, req.note.as_deref())
        .await
        .map_err(|e| match e {
            resto_db::DbError::ShiftClosed { .. } => ApiError::Conflict(
                "The shift register is already closed for today".to_string(),
            ),
            other => other.into(),
        })?;

    info!(cashier = %cashier.username, day = %day, "Shift closed");
    Ok(Json(ShiftResponse {
        success: true,
        record,
    }))
}
