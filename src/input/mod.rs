//! Request-body pipeline for square payloads.
//!
//! Order is fixed: required-field validation runs on the raw JSON first, then
//! the body is parsed into a [`SquareInput`], then every text field is
//! sanitized. Validating first means a payload of `"<b></b>"` for a required
//! field passes validation and is stored as an empty string.

pub mod payload;
pub mod sanitize;
pub mod validate;

use serde_json::Value;
use thiserror::Error;

pub use payload::SquareInput;
pub use sanitize::sanitize;
pub use validate::{validate, REQUIRED_FIELDS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Validate, parse and sanitize a create/update body
pub fn prepare(body: Value) -> Result<SquareInput, InputError> {
    validate(&body)?;
    let mut input = SquareInput::from_value(body)?;
    input.sanitize();
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prepare_validates_before_sanitizing() {
        let input = prepare(json!({
            "title": "<b></b>",
            "plane": "p",
            "purpose": "q",
            "class": "root"
        }))
        .unwrap();
        assert_eq!(input.title.as_deref(), Some(""));
    }

    #[test]
    fn prepare_stops_at_validation() {
        let err = prepare(json!({ "title": "t", "plane": "p", "purpose": "q", "depth": "deep" })).unwrap_err();
        assert_eq!(err, InputError::MissingFields(vec!["class"]));
    }

    #[test]
    fn prepare_rejects_non_objects() {
        assert_eq!(prepare(json!(["title"])).unwrap_err(), InputError::NotAnObject);
    }
}
