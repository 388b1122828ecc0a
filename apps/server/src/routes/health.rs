//! Liveness probe.

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// Health check endpoint.
pub async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "ts": Utc::now().to_rfc3339(),
    }))
}
