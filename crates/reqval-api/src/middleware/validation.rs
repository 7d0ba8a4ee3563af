//! # Schema Validation Middleware
//!
//! [`validate`] compiles a schema once, at route registration, and
//! returns a [`RequestValidator`]. Mount it on a route with
//! [`validate_request`]:
//!
//! ```ignore
//! let validator = validate(&person_schema, EngineOptions::all_errors())?;
//! Router::new().route(
//!     "/persons/{id}",
//!     put(handler).layer(from_fn_with_state(validator, validate_request)),
//! );
//! ```
//!
//! Per request, the parsed body is checked against the compiled schema.
//! A valid body continues to the handler untouched; an invalid one is
//! turned into [`RequestError::Validation`] and handed to the validator's
//! error handler. Exactly one of the two happens per request.
//!
//! Precondition: `parse_json_body` runs first. Without a [`ParsedBody`]
//! extension the request fails with [`RequestError::MissingParsedBody`].

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use reqval_schema::{CompiledValidator, SchemaError, ValidatorConfig};
use serde_json::Value;

use crate::error::RequestError;
use crate::middleware::body_parser::ParsedBody;

/// Turns a rejected request into a response.
pub type ErrorHandler = Arc<dyn Fn(RequestError) -> Response + Send + Sync>;

/// A compiled schema plus the error handler that answers rejected requests.
///
/// Cloning is cheap: the compiled validator is shared, never copied.
#[derive(Clone)]
pub struct RequestValidator {
    validator: Arc<CompiledValidator>,
    on_error: ErrorHandler,
}

impl fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

/// Compile `schema` into a request validator.
///
/// `config` takes a [`ValidatorConfig`], bare engine options, a `Vec` of
/// additional schemas, or a `(schemas, options)` pair.
///
/// # Errors
///
/// Configuration problems (malformed schema, unresolvable `$ref`, bad
/// additional-schema list) are returned here, so route registration fails
/// at startup rather than on the first request.
pub fn validate(
    schema: &Value,
    config: impl Into<ValidatorConfig>,
) -> Result<RequestValidator, SchemaError> {
    RequestValidator::new(schema, config)
}

impl RequestValidator {
    /// See [`validate`].
    pub fn new(schema: &Value, config: impl Into<ValidatorConfig>) -> Result<Self, SchemaError> {
        let compiled = CompiledValidator::compile(schema, config)?;
        Ok(Self::from_compiled(Arc::new(compiled)))
    }

    /// Wrap an already compiled validator, answering errors with the
    /// default [`IntoResponse`] mapping.
    pub fn from_compiled(validator: Arc<CompiledValidator>) -> Self {
        Self {
            validator,
            on_error: Arc::new(|err: RequestError| err.into_response()),
        }
    }

    /// Replace the error handler.
    ///
    /// The handler receives every [`RequestError`] this validator produces.
    /// Errors it does not specifically handle should be passed on with
    /// `err.into_response()`.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(RequestError) -> Response + Send + Sync + 'static,
    {
        self.on_error = Arc::new(handler);
        self
    }

    /// The shared compiled validator.
    pub fn compiled(&self) -> &CompiledValidator {
        &self.validator
    }

    /// Check a parsed body.
    pub fn check_body(&self, body: &Value) -> Result<(), RequestError> {
        self.validator.check(body).map_err(RequestError::from)
    }

    /// Check the [`ParsedBody`] attached to `request`.
    pub fn check_request<B>(&self, request: &axum::http::Request<B>) -> Result<(), RequestError> {
        let ParsedBody(body) = request
            .extensions()
            .get::<ParsedBody>()
            .ok_or(RequestError::MissingParsedBody)?;
        self.check_body(body)
    }

    /// Answer a rejected request with the configured error handler.
    pub fn reject(&self, err: RequestError) -> Response {
        (self.on_error)(err)
    }
}

/// Middleware: validate the parsed body, then continue or reject.
///
/// Mount with `axum::middleware::from_fn_with_state(validator, validate_request)`.
pub async fn validate_request(
    State(validator): State<RequestValidator>,
    request: Request,
    next: Next,
) -> Response {
    match validator.check_request(&request) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::debug!(
                kind = err.kind(),
                method = %request.method(),
                uri = %request.uri(),
                "request body rejected"
            );
            validator.reject(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use reqval_schema::EngineOptions;
    use serde_json::json;

    fn example_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "number"}
            },
            "required": ["name", "age"]
        })
    }

    fn request_with(body: Option<Value>) -> axum::http::Request<()> {
        let mut request = axum::http::Request::new(());
        if let Some(body) = body {
            request.extensions_mut().insert(ParsedBody(body));
        }
        request
    }

    #[test]
    fn valid_body_passes() {
        let validator = validate(&example_schema(), ValidatorConfig::default()).unwrap();
        let request = request_with(Some(json!({"name": "x", "age": 65})));
        assert!(validator.check_request(&request).is_ok());
    }

    #[test]
    fn invalid_body_is_a_validation_error() {
        let validator = validate(&example_schema(), ValidatorConfig::default()).unwrap();
        let err = validator.check_request(&request_with(Some(json!({})))).unwrap_err();
        assert!(err.is_validation_error());
        let failure = err.as_validation_error().unwrap();
        assert_eq!(failure.len(), 1);
        assert_eq!(failure.validation_errors().unwrap()[0].keyword, "required");
    }

    #[test]
    fn missing_parsed_body_is_reported() {
        let validator = validate(&example_schema(), ValidatorConfig::default()).unwrap();
        let err = validator.check_request(&request_with(None)).unwrap_err();
        assert!(matches!(err, RequestError::MissingParsedBody));
    }

    #[test]
    fn options_reach_the_engine() {
        let validator = validate(&example_schema(), EngineOptions::all_errors()).unwrap();
        assert!(validator.compiled().all_errors());
        let err = validator.check_body(&json!({"age": "sixty-five"})).unwrap_err();
        assert!(err.as_validation_error().unwrap().len() >= 2);
    }

    #[test]
    fn broken_schema_fails_at_construction() {
        let err = validate(&json!({"$ref": "https://example.com/nowhere.json"}), ValidatorConfig::default())
            .unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }));
    }

    #[test]
    fn default_handler_uses_error_mapping() {
        let validator = validate(&example_schema(), ValidatorConfig::default()).unwrap();
        let response = validator.reject(RequestError::MissingParsedBody);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn custom_handler_receives_errors() {
        let validator = validate(&example_schema(), ValidatorConfig::default())
            .unwrap()
            .with_error_handler(|err| {
                if err.is_validation_error() {
                    StatusCode::IM_A_TEAPOT.into_response()
                } else {
                    err.into_response()
                }
            });
        let err = validator.check_body(&json!({})).unwrap_err();
        assert_eq!(validator.reject(err).status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            validator.reject(RequestError::PayloadTooLarge { limit: 1 }).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn clones_share_the_compiled_validator() {
        let validator = validate(&example_schema(), ValidatorConfig::default()).unwrap();
        let clone = validator.clone();
        assert!(std::ptr::eq(validator.compiled(), clone.compiled()));
    }
}
