//! Authentication endpoints: login and staff-account registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use resto_core::{validation, Role, User};
use resto_db::NewUser;

use crate::auth::{hash_password, verify_password, AuthenticatedCashier};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
}

/// `POST /auth/login`
///
/// Verifies credentials and issues a bearer token. Unknown usernames and
/// wrong passwords get the same response, so the endpoint never confirms
/// which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state.db.users().find_by_username(&req.username).await?;

    let Some(user) = user.filter(|u| verify_password(&req.password, &u.password_hash)) else {
        warn!(username = %req.username, "Login rejected");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    let token = state.jwt.generate_token(&user)?;
    info!(username = %user.username, role = user.role.as_str(), "Login successful");

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        role: user.role,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// `POST /auth/register` (admin only)
///
/// Creates a staff account. The raw password is hashed here; resto-db
/// only ever sees the argon2 string.
pub async fn register(
    cashier: AuthenticatedCashier,
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    cashier.require_admin()?;

    validation::validate_username(&req.username)?;
    validation::validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)?;
    let role = req.role.as_deref().map(Role::from_tag).unwrap_or(Role::Cashier);

    let user = state
        .db
        .users()
        .insert(NewUser {
            username: req.username.trim().to_string(),
            password_hash,
            role,
            display_name: req.display_name,
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::Conflict("Username is already taken".to_string())
            } else {
                e.into()
            }
        })?;

    info!(username = %user.username, role = user.role.as_str(), "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}
