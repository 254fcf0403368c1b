use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use super::sanitize::sanitize_field;
use super::InputError;

/// Parsed body of a create or update request.
///
/// Every field is optional at this layer; required-field checks happen on the
/// raw JSON before parsing. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SquareInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub plane: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub delineator: Option<String>,
    #[serde(default)]
    pub notations: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default, rename = "extraData")]
    pub extra_data: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub depth: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub size: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub parent_id: Option<i64>,
}

impl SquareInput {
    pub fn from_value(body: Value) -> Result<Self, InputError> {
        if !body.is_object() {
            return Err(InputError::NotAnObject);
        }
        serde_json::from_value(body).map_err(|e| InputError::Malformed(e.to_string()))
    }

    /// Strip tags from every text field in place
    pub fn sanitize(&mut self) {
        for field in [
            &mut self.title,
            &mut self.plane,
            &mut self.purpose,
            &mut self.delineator,
            &mut self.notations,
            &mut self.details,
            &mut self.extra_data,
            &mut self.class,
            &mut self.parent,
            &mut self.name,
            &mut self.color,
            &mut self.kind,
        ] {
            sanitize_field(field);
        }
    }
}

/// Accept an integer as a JSON number, a numeric string, an empty string or
/// null. HTML forms post numbers as strings.
fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(other) => {
            return Err(de::Error::custom(format!("expected an integer, got {}", other)));
        }
    };

    let number = number.ok_or_else(|| de::Error::custom("expected an integer"))?;
    T::try_from(number)
        .map(Some)
        .map_err(|_| de::Error::custom(format!("integer {} out of range", number)))
}
