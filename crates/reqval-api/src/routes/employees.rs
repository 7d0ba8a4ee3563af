//! # Employees
//!
//! Routes:
//! - POST /employees — validate against `employee.json`, with `person.json`
//!   registered as an additional schema for its `$ref`
//! - PUT  /employees/{id} — same, all errors reported

use axum::middleware::from_fn_with_state;
use axum::routing::{post, put};
use axum::Router;
use reqval_schema::{EngineOptions, SchemaError};

use super::{accept, demo_error_handler, schemas};
use crate::middleware::validation::{validate, validate_request};

/// Build the employees router. Fails if the employee schema or its
/// referenced person schema does not compile.
pub fn router() -> Result<Router, SchemaError> {
    let schema = schemas::employee()?;
    let person = schemas::person()?;

    let create = validate(&schema, vec![person.clone()])?.with_error_handler(demo_error_handler);
    let replace = validate(&schema, (vec![person], EngineOptions::all_errors()))?
        .with_error_handler(demo_error_handler);

    Ok(Router::new()
        .route(
            "/employees",
            post(accept).layer(from_fn_with_state(create, validate_request)),
        )
        .route(
            "/employees/{id}",
            put(accept).layer(from_fn_with_state(replace, validate_request)),
        ))
}
