//! API error types and their HTTP mapping.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Mapping                                   │
//! │                                                                         │
//! │  resto-core ValidationError ──────────────► 400 Bad Request            │
//! │  resto-db   UniqueViolation ──────────────► 409 Conflict               │
//! │  resto-db   ShiftNotOpen / ShiftClosed ───► 400 Bad Request            │
//! │  resto-db   NotFound ─────────────────────► 404 Not Found              │
//! │  resto-db   anything else ────────────────► 500 (detail logged,        │
//! │                                                  never sent)           │
//! │                                                                         │
//! │  Wire shape, all statuses:  { "message": "..." }                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use resto_core::ValidationError;
use resto_db::DbError;

/// Error type for all API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or rejected request payload.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Missing, expired, or malformed credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// The request collides with existing state (duplicate shift open,
    /// duplicate username).
    #[error("{0}")]
    Conflict(String),

    /// A required precondition does not hold (no open shift for today).
    #[error("{0}")]
    PreconditionFailed(String),

    /// Unexpected failure. The detail is logged server-side; the client
    /// sees a generic message.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "Request failed");
        }
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::ShiftNotOpen { .. } => ApiError::PreconditionFailed(
                "Opening balance not recorded today. Open the shift register first".to_string(),
            ),
            DbError::ShiftClosed { .. } => ApiError::PreconditionFailed(
                "The shift register is already closed for today".to_string(),
            ),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Result alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use resto_core::BusinessDay;

    #[test]
    fn test_status_mapping() {
        let day: BusinessDay = "2024-06-01".parse().unwrap();

        let err: ApiError = DbError::ShiftNotOpen { day }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = DbError::UniqueViolation {
            field: "business_day".to_string(),
            value: "2024-06-01".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = DbError::not_found("order", "x").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::Internal("boom".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Internal detail never reaches the wire
        assert_eq!(err.to_string(), "Internal server error");
    }
}
