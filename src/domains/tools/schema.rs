//! Field-level input schemas.
//!
//! Every tool declares the fields its input object may carry. Inputs are
//! checked against that declaration before they are decoded into the tool's
//! typed parameters, so a malformed call is answered with the name of the
//! offending field and never reaches a handler.

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::ToolError;

/// JSON type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    String,
    StringArray,
    Object,
    /// A string drawn from a closed set of values.
    Enum(&'static [&'static str]),
}

impl FieldKind {
    fn describe(&self) -> String {
        match self {
            Self::String => "a string".to_string(),
            Self::StringArray => "an array of strings".to_string(),
            Self::Object => "an object".to_string(),
            Self::Enum(values) => format!("one of {}", values.join(", ")),
        }
    }
}

/// Declaration of one input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    fn check(&self, value: &Value) -> Result<(), ToolError> {
        let mismatch = || {
            ToolError::validation(
                self.name,
                format!("expected {}, got {}", self.kind.describe(), type_name(value)),
            )
        };

        match self.kind {
            FieldKind::String => value.as_str().map(|_| ()).ok_or_else(mismatch),
            FieldKind::Object => value.as_object().map(|_| ()).ok_or_else(mismatch),
            FieldKind::StringArray => {
                let items = value.as_array().ok_or_else(mismatch)?;
                for (index, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        return Err(ToolError::validation(
                            format!("{}[{}]", self.name, index),
                            format!("expected a string, got {}", type_name(item)),
                        ));
                    }
                }
                Ok(())
            }
            FieldKind::Enum(values) => match value.as_str() {
                Some(s) if values.contains(&s) => Ok(()),
                _ => Err(mismatch()),
            },
        }
    }
}

/// Validate `input` against `fields`.
///
/// A missing or `null` input counts as an empty object. Fields that are not
/// declared are ignored; optional fields may be absent or `null`.
pub fn validate(fields: &[FieldSpec], input: &Value) -> Result<(), ToolError> {
    let empty = Map::new();
    let object = match input {
        Value::Null => &empty,
        Value::Object(map) => map,
        other => {
            return Err(ToolError::validation(
                "input",
                format!("expected an object, got {}", type_name(other)),
            ));
        }
    };

    for field in fields {
        match object.get(field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(ToolError::validation(field.name, "is required"));
            }
            None | Some(Value::Null) => {}
            Some(value) => field.check(value)?,
        }
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
