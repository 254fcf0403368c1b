use serde_json::Value;

use super::InputError;

pub const REQUIRED_FIELDS: [&str; 4] = ["title", "plane", "purpose", "class"];

/// Check that every required field is present and truthy.
///
/// Absent, `null`, `false`, `0` and `""` all count as missing.
pub fn validate(body: &Value) -> Result<(), InputError> {
    let object = body.as_object().ok_or(InputError::NotAnObject)?;

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !object.get(*field).is_some_and(is_truthy))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(InputError::MissingFields(missing))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_complete_payload() {
        let body = json!({ "title": "Test", "plane": "Test", "purpose": "Test", "class": "root" });
        assert_eq!(validate(&body), Ok(()));
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let body = json!({ "plane": "Test" });
        assert_eq!(
            validate(&body),
            Err(InputError::MissingFields(vec!["title", "purpose", "class"]))
        );
    }

    #[test]
    fn falsy_values_count_as_missing() {
        for falsy in [json!(null), json!(""), json!(0), json!(0.0), json!(false)] {
            let body = json!({ "title": falsy, "plane": "p", "purpose": "q", "class": "c" });
            assert_eq!(
                validate(&body),
                Err(InputError::MissingFields(vec!["title"])),
                "{} should be missing",
                falsy
            );
        }
    }

    #[test]
    fn whitespace_is_present() {
        let body = json!({ "title": " ", "plane": "p", "purpose": "q", "class": "c" });
        assert_eq!(validate(&body), Ok(()));
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert_eq!(validate(&json!("title")), Err(InputError::NotAnObject));
        assert_eq!(validate(&json!(null)), Err(InputError::NotAnObject));
    }
}
