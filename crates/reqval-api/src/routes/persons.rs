//! # Persons
//!
//! Routes:
//! - POST /persons — validate against `person.json`, fail-fast
//! - PUT  /persons/{id} — same schema, all errors reported

use axum::middleware::from_fn_with_state;
use axum::routing::{post, put};
use axum::Router;
use reqval_schema::{EngineOptions, SchemaError, ValidatorConfig};

use super::{accept, demo_error_handler, schemas};
use crate::middleware::validation::{validate, validate_request};

/// Build the persons router. Fails if the person schema does not compile.
pub fn router() -> Result<Router, SchemaError> {
    let schema = schemas::person()?;

    let create = validate(&schema, ValidatorConfig::default())?.with_error_handler(demo_error_handler);
    let replace = validate(&schema, EngineOptions::all_errors())?.with_error_handler(demo_error_handler);

    Ok(Router::new()
        .route(
            "/persons",
            post(accept).layer(from_fn_with_state(create, validate_request)),
        )
        .route(
            "/persons/{id}",
            put(accept).layer(from_fn_with_state(replace, validate_request)),
        ))
}
