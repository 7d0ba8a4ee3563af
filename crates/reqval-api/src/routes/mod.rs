//! # Demo Routes
//!
//! Each module defines an Axum Router for one resource, with a schema
//! validator mounted per route. Routers are assembled in [`crate::app`].
//!
//! Route handlers only acknowledge the request; everything interesting
//! happens in the middleware before them.

pub mod employees;
pub mod persons;
pub mod schemas;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::error::RequestError;

/// Acknowledge a body that passed validation.
async fn accept(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({"success": true}))
}

/// Error handler for the demo routes.
///
/// Validation failures are logged and answered with
/// `{"success": false, "validationErrors": [...]}`. Every other error is
/// passed through to the default mapping unchanged.
pub fn demo_error_handler(err: RequestError) -> Response {
    match err.into_validation_error() {
        Ok(failure) => {
            tracing::info!(
                error_count = failure.len(),
                errors = ?failure.validation_errors(),
                "request body failed validation"
            );
            Json(json!({
                "success": false,
                "validationErrors": failure.validation_errors(),
            }))
            .into_response()
        }
        Err(other) => other.into_response(),
    }
}
