// handlers/squares/mod.rs - /squares resource handlers
//
// Collection routes (/squares) live in collection.rs, single-record routes
// (/squares/:id) in record.rs. Writes are wrapped by the auth middleware at
// the router; handlers only see requests that already passed it.

pub mod collection;
pub mod record;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path};
use serde_json::Value;

use crate::error::ApiError;
use crate::input::{self, SquareInput};

pub use collection::{create, list};
pub use record::{delete, get, update};

/// Unwrap the `:id` segment, rejecting anything that isn't an integer
fn square_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::bad_request("Invalid square id"))
}

/// Validate, parse and sanitize a write body
fn square_input(body: Result<Json<Value>, JsonRejection>) -> Result<SquareInput, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
    Ok(input::prepare(body)?)
}
