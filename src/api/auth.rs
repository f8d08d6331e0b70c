//! Authentication API endpoints
//!
//! Handles HTTP requests for the cookie session flow:
//! - POST /api/auth/login - Issue a session cookie from an email
//! - POST /api/auth/logout - Clear the session cookie
//! - GET /api/auth/verify - Echo the identity carried by the cookie

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    extract::State,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::SessionUser;

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
}

/// Response for successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub token: String,
}

/// Response for logout
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Response for verify
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: SessionUser,
}

/// Build the public auth routes (no session required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Build the protected auth routes (session required)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/verify", get(verify))
}

/// POST /api/auth/login - Issue a session cookie
///
/// Validates the email, derives the deterministic identity, and sets the
/// `session` cookie carrying it.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .session_service
        .login(&body.email)
        .map_err(|e| ApiError::validation_error(e.to_string()))?;

    let cookie = state.session_service.issue_cookie(&outcome.user);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::internal_error(e.to_string()))?,
    );

    tracing::info!(user_id = %outcome.user.id, "session issued");

    Ok((
        headers,
        Json(LoginResponse {
            user: outcome.user,
            token: outcome.token,
        }),
    ))
}

/// POST /api/auth/logout - Clear the session cookie
///
/// Always succeeds, whether or not a session was presented.
async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cookie = state.session_service.clear_cookie();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::internal_error(e.to_string()))?,
    );

    Ok((headers, Json(LogoutResponse { success: true })))
}

/// GET /api/auth/verify - Echo the identity carried by the cookie
async fn verify(user: AuthenticatedUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { user: user.0 })
}
