//! # Compiled Validator
//!
//! Compiles one primary schema, together with its registered additional
//! schemas and engine options, into an immutable validator.
//!
//! ## Construction Order
//!
//! 1. Engine options (draft, format assertions) are applied.
//! 2. Additional schemas are registered in list order.
//! 3. The primary schema is compiled. A malformed schema or an
//!    unresolvable `$ref` fails here, at factory time.
//!
//! ## Thread Safety
//!
//! `CompiledValidator` is `Send + Sync` and never mutated after
//! construction, so one instance can serve concurrent requests behind an
//! `Arc`.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;

use crate::descriptor::ValidationErrorDescriptor;
use crate::error::SchemaError;
use crate::failure::JsonSchemaValidationError;
use crate::options::ValidatorConfig;
use crate::registry::SchemaRegistry;

/// A schema compiled together with its configuration.
pub struct CompiledValidator {
    validator: Validator,
    /// Primary schema, as passed to the factory.
    schema: Value,
    all_errors: bool,
    additional_schema_count: usize,
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("schema_id", &self.schema.get("$id"))
            .field("all_errors", &self.all_errors)
            .field("additional_schema_count", &self.additional_schema_count)
            .finish()
    }
}

impl CompiledValidator {
    /// Compile `schema` with the given configuration.
    ///
    /// `config` accepts anything convertible into a [`ValidatorConfig`]:
    /// the config itself, bare [`EngineOptions`](crate::EngineOptions), a
    /// `Vec` of additional schemas, or a `(schemas, options)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingSchemaId`] or
    /// [`SchemaError::DuplicateSchemaId`] for a bad additional-schema list,
    /// and [`SchemaError::Compile`] when the engine rejects the schema or
    /// cannot resolve one of its references.
    pub fn compile(schema: &Value, config: impl Into<ValidatorConfig>) -> Result<Self, SchemaError> {
        let config = config.into();

        let mut opts = jsonschema::options();
        config.options.apply(&mut opts);

        let registry = SchemaRegistry::from_schemas(&config.additional_schemas)?;
        let additional_schema_count = registry.len();
        opts.with_retriever(registry);

        let validator = opts.build(schema).map_err(|e| SchemaError::Compile {
            reason: e.to_string(),
        })?;

        tracing::debug!(
            schema_id = ?schema.get("$id"),
            additional_schema_count,
            all_errors = config.options.all_errors,
            "compiled request schema"
        );

        Ok(Self {
            validator,
            schema: schema.clone(),
            all_errors: config.options.all_errors,
            additional_schema_count,
        })
    }

    /// Validate `instance`.
    ///
    /// Fail-fast mode reports exactly the first violation; collect-all mode
    /// reports every violation in discovery order.
    pub fn check(&self, instance: &Value) -> Result<(), JsonSchemaValidationError> {
        let limit = if self.all_errors { usize::MAX } else { 1 };
        let descriptors: Vec<ValidationErrorDescriptor> = self
            .validator
            .iter_errors(instance)
            .take(limit)
            .map(|e| ValidationErrorDescriptor::from_engine_error(&e))
            .collect();

        if descriptors.is_empty() {
            Ok(())
        } else {
            Err(JsonSchemaValidationError::new(Some(descriptors)))
        }
    }

    /// Fast boolean check without building descriptors.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// The primary schema this validator was compiled from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Whether collect-all-errors mode is enabled.
    pub fn all_errors(&self) -> bool {
        self.all_errors
    }

    /// Number of additional schemas registered before compilation.
    pub fn additional_schema_count(&self) -> usize {
        self.additional_schema_count
    }
}
