//! # Validation Failure Value
//!
//! The value produced when a document does not satisfy its schema. It is
//! expected and frequent, so it is data handed to an error handler rather
//! than a fault.
//!
//! On the wire the failure keeps the fixed discriminant name
//! `"JsonSchemaValidationError"` so it can still be recognised after
//! crossing a serialization boundary:
//!
//! ```text
//! { "name": "JsonSchemaValidationError", "validationErrors": [ ... ] | null }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::descriptor::ValidationErrorDescriptor;

/// Tag used by the tagged-variant wire form (`{"kind": "validation_error"}`).
pub const VALIDATION_ERROR_KIND: &str = "validation_error";

/// A request body failed schema validation.
///
/// Descriptors are ordered as the engine discovered them. The list is
/// `None` only when the engine reported a failure without details.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FailureWire", into = "FailureWire")]
#[error(
    "request body failed schema validation ({} error(s))",
    .validation_errors.as_ref().map_or(0, Vec::len)
)]
pub struct JsonSchemaValidationError {
    validation_errors: Option<Vec<ValidationErrorDescriptor>>,
}

impl JsonSchemaValidationError {
    /// Discriminant name carried by every validation failure.
    pub const NAME: &'static str = "JsonSchemaValidationError";

    /// Wrap the descriptors reported by the engine.
    pub fn new(validation_errors: Option<Vec<ValidationErrorDescriptor>>) -> Self {
        Self { validation_errors }
    }

    /// Always [`Self::NAME`].
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// The descriptors, in discovery order.
    pub fn validation_errors(&self) -> Option<&[ValidationErrorDescriptor]> {
        self.validation_errors.as_deref()
    }

    /// Consume the failure and return the descriptors.
    pub fn into_validation_errors(self) -> Option<Vec<ValidationErrorDescriptor>> {
        self.validation_errors
    }

    /// Number of descriptors (zero when none were reported).
    pub fn len(&self) -> usize {
        self.validation_errors.as_ref().map_or(0, Vec::len)
    }

    /// True when no descriptors were reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailureWire {
    name: String,
    #[serde(default)]
    validation_errors: Option<Vec<ValidationErrorDescriptor>>,
}

impl From<JsonSchemaValidationError> for FailureWire {
    fn from(err: JsonSchemaValidationError) -> Self {
        Self {
            name: JsonSchemaValidationError::NAME.to_string(),
            validation_errors: err.validation_errors,
        }
    }
}

impl TryFrom<FailureWire> for JsonSchemaValidationError {
    type Error = String;

    fn try_from(wire: FailureWire) -> Result<Self, Self::Error> {
        if wire.name != JsonSchemaValidationError::NAME {
            return Err(format!(
                "expected name {:?}, found {:?}",
                JsonSchemaValidationError::NAME,
                wire.name
            ));
        }
        Ok(Self::new(wire.validation_errors))
    }
}

/// Recognise a serialized validation failure by its discriminant.
///
/// Accepts both the named form (`"name": "JsonSchemaValidationError"`) and
/// the tagged form (`"kind": "validation_error"`). Name-based matching is
/// loose: an unrelated error carrying the same name is also accepted.
pub fn is_validation_error_value(value: &Value) -> bool {
    let named = value.get("name").and_then(Value::as_str) == Some(JsonSchemaValidationError::NAME);
    let tagged = value.get("kind").and_then(Value::as_str) == Some(VALIDATION_ERROR_KIND);
    named || tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing_name() -> ValidationErrorDescriptor {
        ValidationErrorDescriptor {
            keyword: "required".into(),
            instance_path: String::new(),
            schema_path: "#/required".into(),
            params: json!({"missingProperty": "name"}).as_object().cloned().unwrap(),
            message: "\"name\" is a required property".into(),
        }
    }

    #[test]
    fn carries_fixed_name() {
        let err = JsonSchemaValidationError::new(Some(vec![missing_name()]));
        assert_eq!(err.name(), "JsonSchemaValidationError");
        assert_eq!(err.len(), 1);
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn absent_descriptors_are_representable() {
        let err = JsonSchemaValidationError::new(None);
        assert!(err.validation_errors().is_none());
        assert!(err.is_empty());

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, json!({"name": "JsonSchemaValidationError", "validationErrors": null}));
    }

    #[test]
    fn serialized_form_is_recognised_by_name() {
        let err = JsonSchemaValidationError::new(Some(vec![missing_name()]));
        let value = serde_json::to_value(&err).unwrap();

        assert_eq!(value["name"], "JsonSchemaValidationError");
        assert_eq!(value["validationErrors"][0]["keyword"], "required");
        assert!(is_validation_error_value(&value));

        let back: JsonSchemaValidationError = serde_json::from_value(value).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn foreign_name_is_rejected_on_deserialize() {
        let value = json!({"name": "TypeError", "validationErrors": []});
        assert!(serde_json::from_value::<JsonSchemaValidationError>(value).is_err());
    }

    #[test]
    fn classifier_accepts_tagged_form() {
        assert!(is_validation_error_value(&json!({"kind": "validation_error", "errors": []})));
        assert!(!is_validation_error_value(&json!({"kind": "malformed_body"})));
        assert!(!is_validation_error_value(&json!({"name": "Error"})));
        assert!(!is_validation_error_value(&json!("JsonSchemaValidationError")));
    }
}
