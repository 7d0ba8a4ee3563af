//! # reqval-api — Axum Request Validation
//!
//! The HTTP half of request validation. Provides two middleware layers,
//! the error type they fail with, and a demo service wiring them up.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → parse_json_body → validate_request (per route) → Handler
//! ```
//!
//! - [`middleware::body_parser::parse_json_body`] parses the JSON body once
//!   into a [`ParsedBody`] extension.
//! - [`middleware::validation::validate_request`] checks it against the
//!   route's [`RequestValidator`] and either continues or hands a
//!   [`RequestError`] to the validator's error handler.
//!
//! ## Demo API Surface
//!
//! | Route                  | Schema          | Mode        |
//! |------------------------|-----------------|-------------|
//! | `POST /persons`        | person          | fail-fast   |
//! | `PUT /persons/{id}`    | person          | all errors  |
//! | `POST /employees`      | employee+person | fail-fast   |
//! | `PUT /employees/{id}`  | employee+person | all errors  |
//! | `GET /openapi.json`    | —               | —           |
//! | `GET /health/*`        | —               | —           |
//!
//! ## Crate Policy
//!
//! - Schema problems surface from [`app`] at startup, never per request.
//! - All errors map to structured HTTP responses via [`RequestError`].

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;

pub use config::{AppConfig, ConfigError};
pub use error::{is_validation_error, ErrorBody, ErrorDetail, RequestError};
pub use middleware::body_parser::{parse_json_body, BodyParserConfig, ParsedBody};
pub use middleware::validation::{validate, validate_request, ErrorHandler, RequestValidator};

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use reqval_schema::SchemaError;
use tower_http::trace::TraceLayer;

/// Assemble the demo application router.
///
/// Health probes and the OpenAPI document sit outside the body parser.
///
/// # Errors
///
/// Returns the [`SchemaError`] of the first route whose schema fails to
/// compile.
pub fn app(config: &AppConfig) -> Result<Router, SchemaError> {
    let api = Router::new()
        .merge(routes::persons::router()?)
        .merge(routes::employees::router()?)
        .layer(from_fn_with_state(config.body_parser(), parse_json_body));

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Ok(Router::new()
        .merge(health)
        .merge(openapi::router())
        .merge(api)
        .layer(TraceLayer::new_for_http()))
}

/// Liveness probe. Always 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Schemas are compiled before the router exists.
async fn readiness() -> &'static str {
    "ready"
}
