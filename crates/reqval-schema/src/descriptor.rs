//! # Validation Error Descriptors
//!
//! One descriptor per violated constraint. The serialized form is the
//! camelCase record consumers of a validation failure rely on:
//!
//! ```text
//! { "keyword", "instancePath", "schemaPath", "params", "message" }
//! ```

use std::fmt;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

/// A single violated constraint, with paths into both the validated
/// document and the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorDescriptor {
    /// The schema keyword that failed (`required`, `type`, `minimum`, ...).
    pub keyword: String,
    /// JSON Pointer into the validated document. Empty for the root.
    pub instance_path: String,
    /// URI-fragment JSON Pointer into the schema, e.g. `#/properties/age/type`.
    pub schema_path: String,
    /// Keyword-specific parameters, e.g. `{"missingProperty": "name"}`.
    #[schema(value_type = Object)]
    pub params: Map<String, Value>,
    /// Human-readable description from the validation engine.
    pub message: String,
}

impl ValidationErrorDescriptor {
    /// Build a descriptor from an engine error.
    ///
    /// Keyword and params come from the error kind alone; the schema is
    /// never consulted.
    pub fn from_engine_error(error: &ValidationError<'_>) -> Self {
        let schema_pointer = error.schema_path.to_string();
        let (keyword, params) = keyword_and_params(&error.kind, &schema_pointer);

        Self {
            keyword,
            instance_path: error.instance_path.to_string(),
            schema_path: format!("#{schema_pointer}"),
            params: params_map(params),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ValidationErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {} [{}]", self.message, self.keyword)
        } else {
            write!(f, "{}: {} [{}]", self.instance_path, self.message, self.keyword)
        }
    }
}

fn keyword_and_params(kind: &ValidationErrorKind, schema_pointer: &str) -> (String, Value) {
    use ValidationErrorKind as K;

    let (keyword, params) = match kind {
        K::AdditionalItems { limit } => ("additionalItems", json!({"limit": limit})),
        K::AdditionalProperties { unexpected } => (
            "additionalProperties",
            json!({"additionalProperty": unexpected.first(), "unexpected": unexpected}),
        ),
        K::AnyOf => ("anyOf", json!({})),
        K::BacktrackLimitExceeded { error } => ("pattern", json!({"error": error.to_string()})),
        K::Constant { expected_value } => ("const", json!({"allowedValue": expected_value})),
        K::Contains => ("contains", json!({})),
        K::ContentEncoding { content_encoding } => {
            ("contentEncoding", json!({"contentEncoding": content_encoding}))
        }
        K::ContentMediaType { content_media_type } => {
            ("contentMediaType", json!({"contentMediaType": content_media_type}))
        }
        // Custom keywords carry their own name as the last schema path token.
        K::Custom { message } => {
            return (custom_keyword(schema_pointer), json!({"message": message}));
        }
        K::Enum { options } => ("enum", json!({"allowedValues": options})),
        K::ExclusiveMaximum { limit } => ("exclusiveMaximum", json!({"limit": limit})),
        K::ExclusiveMinimum { limit } => ("exclusiveMinimum", json!({"limit": limit})),
        K::FalseSchema => ("false schema", json!({})),
        K::Format { format } => ("format", json!({"format": format})),
        K::FromUtf8 { error } => ("contentEncoding", json!({"error": error.to_string()})),
        K::MaxItems { limit } => ("maxItems", json!({"limit": limit})),
        K::Maximum { limit } => ("maximum", json!({"limit": limit})),
        K::MaxLength { limit } => ("maxLength", json!({"limit": limit})),
        K::MaxProperties { limit } => ("maxProperties", json!({"limit": limit})),
        K::MinItems { limit } => ("minItems", json!({"limit": limit})),
        K::Minimum { limit } => ("minimum", json!({"limit": limit})),
        K::MinLength { limit } => ("minLength", json!({"limit": limit})),
        K::MinProperties { limit } => ("minProperties", json!({"limit": limit})),
        K::MultipleOf { multiple_of } => ("multipleOf", json!({"multipleOf": multiple_of})),
        K::Not { .. } => ("not", json!({})),
        K::OneOfMultipleValid => ("oneOf", json!({"passingSchemas": "multiple"})),
        K::OneOfNotValid => ("oneOf", json!({"passingSchemas": null})),
        K::Pattern { pattern } => ("pattern", json!({"pattern": pattern})),
        K::PropertyNames { error } => (
            "propertyNames",
            json!({"propertyName": &*error.instance}),
        ),
        K::Required { property } => ("required", json!({"missingProperty": property})),
        K::Type { kind } => ("type", json!({"type": type_names(kind)})),
        K::UnevaluatedItems { unexpected } => {
            ("unevaluatedItems", json!({"unexpected": unexpected}))
        }
        K::UnevaluatedProperties { unexpected } => (
            "unevaluatedProperties",
            json!({"unevaluatedProperty": unexpected.first(), "unexpected": unexpected}),
        ),
        K::UniqueItems => ("uniqueItems", json!({})),
        K::Referencing(error) => ("$ref", json!({"error": error.to_string()})),
    };
    (keyword.to_string(), params)
}

/// `"number"` for a single type, `["number", "string"]` for several.
fn type_names(kind: &TypeKind) -> Value {
    match kind {
        TypeKind::Single(ty) => Value::String(ty.to_string()),
        TypeKind::Multiple(types) => (*types)
            .into_iter()
            .map(|ty| Value::String(ty.to_string()))
            .collect(),
    }
}

fn custom_keyword(schema_pointer: &str) -> String {
    match schema_pointer.rsplit('/').next() {
        Some(token) if !token.is_empty() => token.replace("~1", "/").replace("~0", "~"),
        _ => "custom".to_string(),
    }
}

fn params_map(params: Value) -> Map<String, Value> {
    match params {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
