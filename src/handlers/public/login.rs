// handlers/public/login.rs - POST /login handler

use axum::extract::State;
use serde_json::{json, Value};
use tracing::warn;

use crate::app::AppState;
use crate::auth::STUB_SUBJECT;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /login - Issue a bearer token
///
/// PLACEHOLDER: no credentials are checked. Every call receives a token for
/// the fixed subject "1", valid for the configured lifetime (1 hour by
/// default). Anyone who can reach this route can write squares, so it must be
/// replaced with real credential verification before the protected routes are
/// relied on.
///
/// Expected Output:
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiI...",
///   "expires_in": 3600
/// }
/// ```
pub async fn login(State(state): State<AppState>) -> ApiResult<Value> {
    let issuer = state
        .auth
        .issuer()
        .ok_or_else(|| ApiError::not_found("Route not found"))?;

    let token = issuer.generate_token(STUB_SUBJECT)?;
    warn!(subject = STUB_SUBJECT, "Issued token from placeholder login");

    Ok(ApiResponse::success(json!({
        "token": token,
        "expires_in": issuer.lifetime().num_seconds()
    })))
}
