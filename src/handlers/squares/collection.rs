// handlers/squares/collection.rs - GET/POST /squares

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json, State};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::Square;
use crate::middleware::{ApiResponse, ApiResult};

use super::square_input;

/// GET /squares - Every square, unfiltered. An empty table is `[]`.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Square>> {
    let squares = state.store.list().await?;
    Ok(ApiResponse::success(squares))
}

/// POST /squares - Create a square, responding 201 with the assigned id
///
/// Expected Input:
/// ```json
/// {
///   "title": "string",      // Required
///   "plane": "string",      // Required
///   "purpose": "string",    // Required
///   "class": "string",      // Required
///   "depth": 0,
///   "name": "string",
///   "size": 10,
///   "parent_id": 1
/// }
/// ```
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let input = square_input(body)?;
    let id = state.store.create(&input).await?;

    info!(id, subject = %identity.subject, "Created square");
    Ok(ApiResponse::created(json!({ "id": id })))
}
