use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Authentication stage for protected routes.
///
/// In JWT mode, validates the bearer token and injects the caller's
/// [`Identity`](crate::auth::Identity) into request extensions; a missing
/// credential is rejected with 401, a bad one with 403. In open mode every
/// request passes as the anonymous identity.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state.auth.authenticate(request.headers())?;

    tracing::debug!(subject = %identity.subject, "Request authenticated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
