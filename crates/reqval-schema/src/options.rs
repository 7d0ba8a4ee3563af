//! # Engine Options & Validator Configuration
//!
//! [`ValidatorConfig`] is the single configuration object accepted by the
//! validator factory. Every historical call shape maps onto it through a
//! `From` conversion:
//!
//! | Call shape                    | Conversion                              |
//! |-------------------------------|-----------------------------------------|
//! | schema only                   | `ValidatorConfig::default()`            |
//! | schema + options              | `From<EngineOptions>`                   |
//! | schema + additional schemas   | `From<Vec<Value>>`                      |
//! | schema + schemas + options    | `From<(Vec<Value>, EngineOptions)>`     |

use jsonschema::{Draft, ValidationOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Keys understood by [`EngineOptions::from_value`].
const RECOGNISED_OPTIONS: &[&str] = &["allErrors", "draft", "validateFormats"];

/// JSON Schema draft to validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaDraft {
    #[serde(rename = "draft4")]
    Draft4,
    #[serde(rename = "draft6")]
    Draft6,
    #[serde(rename = "draft7")]
    Draft7,
    #[serde(rename = "draft2019-09")]
    Draft201909,
    #[serde(rename = "draft2020-12")]
    Draft202012,
}

impl From<SchemaDraft> for Draft {
    fn from(draft: SchemaDraft) -> Self {
        match draft {
            SchemaDraft::Draft4 => Draft::Draft4,
            SchemaDraft::Draft6 => Draft::Draft6,
            SchemaDraft::Draft7 => Draft::Draft7,
            SchemaDraft::Draft201909 => Draft::Draft201909,
            SchemaDraft::Draft202012 => Draft::Draft202012,
        }
    }
}

/// Settings passed through to the validation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Collect every violation instead of stopping at the first one.
    pub all_errors: bool,
    /// Force a draft. When absent the engine reads `$schema`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<SchemaDraft>,
    /// Enable or disable `format` assertions. Engine default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_formats: Option<bool>,
}

impl EngineOptions {
    /// Options with collect-all-errors mode enabled.
    pub fn all_errors() -> Self {
        Self {
            all_errors: true,
            ..Self::default()
        }
    }

    /// Parse options from an open JSON mapping such as `{"allErrors": true}`.
    ///
    /// `null` yields the defaults. Unrecognised keys are ignored with a
    /// warning; a recognised key with the wrong type is an error.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let map = value.as_object().ok_or_else(|| {
            SchemaError::InvalidOptions(format!("expected a JSON object, found {value}"))
        })?;
        for key in map.keys() {
            if !RECOGNISED_OPTIONS.contains(&key.as_str()) {
                tracing::warn!(option = %key, "ignoring unrecognised engine option");
            }
        }
        serde_json::from_value(value.clone()).map_err(|e| SchemaError::InvalidOptions(e.to_string()))
    }

    /// Apply the engine-level settings to a jsonschema options builder.
    pub(crate) fn apply(&self, opts: &mut ValidationOptions) {
        if let Some(draft) = self.draft {
            opts.with_draft(draft.into());
        }
        if let Some(validate_formats) = self.validate_formats {
            opts.should_validate_formats(validate_formats);
        }
    }
}

/// Everything the factory needs besides the primary schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorConfig {
    /// Schemas registered, in order, before the primary schema is compiled.
    pub additional_schemas: Vec<Value>,
    /// Engine settings.
    pub options: EngineOptions,
}

impl ValidatorConfig {
    /// Defaults: no additional schemas, fail-fast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one additional schema.
    pub fn with_additional_schema(mut self, schema: Value) -> Self {
        self.additional_schemas.push(schema);
        self
    }

    /// Append several additional schemas, keeping their order.
    pub fn with_additional_schemas(mut self, schemas: impl IntoIterator<Item = Value>) -> Self {
        self.additional_schemas.extend(schemas);
        self
    }

    /// Replace the engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<EngineOptions> for ValidatorConfig {
    fn from(options: EngineOptions) -> Self {
        Self {
            additional_schemas: Vec::new(),
            options,
        }
    }
}

impl From<Vec<Value>> for ValidatorConfig {
    fn from(additional_schemas: Vec<Value>) -> Self {
        Self {
            additional_schemas,
            options: EngineOptions::default(),
        }
    }
}

impl From<(Vec<Value>, EngineOptions)> for ValidatorConfig {
    fn from((additional_schemas, options): (Vec<Value>, EngineOptions)) -> Self {
        Self {
            additional_schemas,
            options,
        }
    }
}
