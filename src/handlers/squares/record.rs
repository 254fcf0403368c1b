// handlers/squares/record.rs - GET/PUT/DELETE /squares/:id

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Extension, Json, Path, State};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::Square;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::{square_id, square_input};

fn square_not_found() -> ApiError {
    ApiError::not_found("Square not found")
}

/// GET /squares/:id - Get a single square by id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Square> {
    let id = square_id(id)?;
    let square = state.store.find(id).await?.ok_or_else(square_not_found)?;
    Ok(ApiResponse::success(square))
}

/// PUT /squares/:id - Overwrite every field of a square
///
/// Takes the same body as POST /squares. Fields left out are cleared.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let id = square_id(id)?;
    let input = square_input(body)?;

    if !state.store.update(id, &input).await? {
        return Err(square_not_found());
    }

    info!(id, subject = %identity.subject, "Updated square");
    Ok(ApiResponse::success(json!({ "message": "Square updated successfully" })))
}

/// DELETE /squares/:id - Hard delete. Squares whose parent_id points here are left alone.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let id = square_id(id)?;

    if !state.store.delete(id).await? {
        return Err(square_not_found());
    }

    info!(id, subject = %identity.subject, "Deleted square");
    Ok(ApiResponse::success(json!({ "message": "Square deleted successfully" })))
}
