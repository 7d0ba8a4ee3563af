//! # Service Configuration
//!
//! Read from the environment at startup:
//!
//! | Variable            | Default  | Meaning                        |
//! |---------------------|----------|--------------------------------|
//! | `PORT`              | `3000`   | Listen port                    |
//! | `REQVAL_BODY_LIMIT` | `102400` | Maximum JSON body size (bytes) |

use thiserror::Error;

use crate::middleware::body_parser::{BodyParserConfig, DEFAULT_BODY_LIMIT};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// A configuration variable is set but unusable.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for the demo service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            body_limit: parse_var(&lookup, "REQVAL_BODY_LIMIT")?.unwrap_or(defaults.body_limit),
        })
    }

    /// Body parser settings derived from this configuration.
    pub fn body_parser(&self) -> BodyParserConfig {
        BodyParserConfig {
            limit: self.body_limit,
            ..BodyParserConfig::default()
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value,
            reason: e.to_string(),
        })
}
