//! # Request Errors
//!
//! The failure side of the validation middleware as a sum type. A schema
//! violation is [`RequestError::Validation`]; everything else the adapter
//! can hit is a separate variant, so error handlers discriminate with a
//! `match` instead of comparing name strings.
//!
//! The default mapping to HTTP is [`IntoResponse`], using the structured
//! [`ErrorBody`] format. Internal error details are never returned to
//! clients.
//!
//! The serialized form is tagged by `kind`:
//!
//! ```text
//! { "kind": "validation_error", "name": "JsonSchemaValidationError", "validationErrors": [...] }
//! { "kind": "malformed_body", "reason": "..." }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqval_schema::JsonSchemaValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// For validation failures: `{ "name", "validationErrors" }`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Everything the body parser and validation middleware can fail with.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestError {
    /// The body does not satisfy the route's schema (422).
    #[serde(rename = "validation_error")]
    #[error(transparent)]
    Validation(#[from] JsonSchemaValidationError),

    /// The body is not valid JSON (400).
    #[error("malformed JSON body: {reason}")]
    MalformedBody { reason: String },

    /// The body is larger than the parser limit (413).
    #[error("request body exceeds the {limit}-byte limit")]
    PayloadTooLarge { limit: usize },

    /// Validation ran before the JSON body parser (500).
    ///
    /// A wiring defect: `parse_json_body` must run before
    /// `validate_request`.
    #[error("request body was not parsed before validation")]
    MissingParsedBody,
}

impl RequestError {
    /// The `kind` tag of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => reqval_schema::VALIDATION_ERROR_KIND,
            Self::MalformedBody { .. } => "malformed_body",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::MissingParsedBody => "missing_parsed_body",
        }
    }

    /// True for schema violations.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation failure, if this is one.
    pub fn as_validation_error(&self) -> Option<&JsonSchemaValidationError> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }

    /// Split off the validation failure, handing back any other error unchanged.
    pub fn into_validation_error(self) -> Result<JsonSchemaValidationError, Self> {
        match self {
            Self::Validation(failure) => Ok(failure),
            other => Err(other),
        }
    }

    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::MalformedBody { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::MissingParsedBody => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Error classifier for handler chains: true iff `err` is a schema violation.
pub fn is_validation_error(err: &RequestError) -> bool {
    err.is_validation_error()
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let internal = matches!(&self, Self::MissingParsedBody);
        if internal {
            tracing::error!(error = %self, "internal server error");
        }

        // Never expose internal error messages to clients.
        let message = if internal {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let details = match &self {
            Self::Validation(failure) => serde_json::to_value(failure).ok(),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
