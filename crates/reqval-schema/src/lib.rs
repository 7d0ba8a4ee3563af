//! # reqval-schema — JSON Schema Adapter
//!
//! The engine-facing half of request validation. Compiles a JSON Schema
//! (plus any schemas it references) into an immutable validator and turns
//! engine errors into structured descriptors.
//!
//! ## Validator Construction (`validator`)
//!
//! [`CompiledValidator::compile`] takes the primary schema and a
//! [`ValidatorConfig`]. Additional schemas are registered in a
//! [`SchemaRegistry`] before compilation so that cross-schema `$ref`s
//! resolve at construction time. A broken schema or an unresolvable
//! reference is a [`SchemaError`], never a per-request failure.
//!
//! ## Validation Failures (`failure`)
//!
//! A failing check yields a [`JsonSchemaValidationError`] carrying the
//! ordered [`ValidationErrorDescriptor`]s. Fail-fast by default; set
//! [`EngineOptions::all_errors`] to collect every violation.
//!
//! ## Crate Policy
//!
//! - No HTTP types. The axum adapter lives in `reqval-api`.
//! - The engine never fetches references over the network. Only schemas
//!   registered through [`ValidatorConfig`] are resolvable.
//! - No `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod failure;
pub mod options;
pub mod registry;
pub mod validator;

pub use descriptor::ValidationErrorDescriptor;
pub use error::SchemaError;
pub use failure::{is_validation_error_value, JsonSchemaValidationError, VALIDATION_ERROR_KIND};
pub use options::{EngineOptions, SchemaDraft, ValidatorConfig};
pub use registry::SchemaRegistry;
pub use validator::CompiledValidator;
