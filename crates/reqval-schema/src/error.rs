//! # Configuration Errors
//!
//! Errors raised while building a validator. All of them surface
//! synchronously from the factory call so that a broken schema stops
//! route registration instead of failing on the first request.

use thiserror::Error;

/// Error while configuring or compiling a schema validator.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Engine options could not be interpreted.
    #[error("invalid engine options: {0}")]
    InvalidOptions(String),

    /// An additional schema has no string `$id` to register it under.
    #[error("additional schema at index {index} has no string \"$id\"")]
    MissingSchemaId {
        /// Position of the offending schema in the additional-schemas list.
        index: usize,
    },

    /// Two additional schemas share the same `$id`.
    #[error("schema with id {0:?} is already registered")]
    DuplicateSchemaId(String),

    /// The primary schema is malformed or references something that
    /// cannot be resolved.
    #[error("failed to compile schema: {reason}")]
    Compile {
        /// Reason reported by the validation engine.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_context() {
        let err = SchemaError::MissingSchemaId { index: 2 };
        assert!(err.to_string().contains("index 2"));

        let err = SchemaError::DuplicateSchemaId("https://example.com/person.json".into());
        assert!(err.to_string().contains("person.json"));

        let err = SchemaError::Compile {
            reason: "unresolvable reference".into(),
        };
        assert!(err.to_string().contains("unresolvable reference"));

        let err = SchemaError::InvalidOptions("allErrors: expected bool".into());
        assert!(err.to_string().starts_with("invalid engine options"));
    }
}
