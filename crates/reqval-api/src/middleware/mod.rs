//! # Middleware Modules
//!
//! The two request-side layers, in execution order:
//!
//! ```text
//! parse_json_body → validate_request → handler
//! ```

pub mod body_parser;
pub mod validation;
