//! # OpenAPI Specification
//!
//! Documents the error contract of the validation middleware: the
//! structured error body and the validation error descriptor. Served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

/// OpenAPI document for the error contract.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "reqval — JSON Schema request validation",
        description = "Error contract of the request validation middleware."
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        reqval_schema::ValidationErrorDescriptor,
    ))
)]
pub struct ApiDoc;

/// Router serving the OpenAPI JSON document.
pub fn router() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
