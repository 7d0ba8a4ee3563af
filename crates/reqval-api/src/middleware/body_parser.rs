//! # JSON Body Parser
//!
//! Buffers a JSON request body, parses it once, and stores the result as a
//! [`ParsedBody`] request extension for the validation middleware. Must be
//! layered outside (before) `validate_request`.
//!
//! | Request                              | Outcome                          |
//! |--------------------------------------|----------------------------------|
//! | `application/json`, `*/*+json`       | parsed, `ParsedBody(value)`      |
//! | JSON content type, empty body        | `ParsedBody({})`                 |
//! | any other content type               | `ParsedBody({})`, body untouched |
//! | invalid JSON / strict-mode scalar    | [`RequestError::MalformedBody`]  |
//! | body over the limit                  | [`RequestError::PayloadTooLarge`] |
//!
//! The buffered bytes are put back as the request body, so `Json<T>`
//! extractors further down still work.

use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use crate::error::RequestError;

/// Default body size limit: 100 KiB.
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyParserConfig {
    /// Maximum body size in bytes.
    pub limit: usize,
    /// Only accept objects and arrays at the top level.
    pub strict: bool,
}

impl Default for BodyParserConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_BODY_LIMIT,
            strict: true,
        }
    }
}

/// The parsed JSON body of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBody(pub Value);

impl ParsedBody {
    /// The `{}` body used when there is nothing to parse.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ParsedBody {
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ParsedBody>()
            .cloned()
            .ok_or(RequestError::MissingParsedBody)
    }
}

/// Middleware: parse the JSON body into a [`ParsedBody`] extension.
///
/// Mount with `axum::middleware::from_fn_with_state(config, parse_json_body)`.
pub async fn parse_json_body(
    State(config): State<BodyParserConfig>,
    request: Request,
    next: Next,
) -> Result<Response, RequestError> {
    let (mut parts, body) = request.into_parts();

    if !is_json_content_type(&parts.headers) {
        parts.extensions.insert(ParsedBody::empty());
        return Ok(next.run(Request::from_parts(parts, body)).await);
    }

    let bytes = axum::body::to_bytes(body, config.limit)
        .await
        .map_err(|err| read_error(err, config.limit))?;

    let value = parse(&bytes, config.strict)?;
    tracing::trace!(bytes = bytes.len(), "parsed JSON request body");

    parts.extensions.insert(ParsedBody(value));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn parse(bytes: &[u8], strict: bool) -> Result<Value, RequestError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ParsedBody::empty().0);
    }
    let value: Value = serde_json::from_slice(bytes).map_err(|e| RequestError::MalformedBody {
        reason: e.to_string(),
    })?;
    if strict && !(value.is_object() || value.is_array()) {
        return Err(RequestError::MalformedBody {
            reason: "top-level value must be an object or an array".to_string(),
        });
    }
    Ok(value)
}

fn read_error(err: axum::Error, limit: usize) -> RequestError {
    let over_limit = std::iter::successors(
        Some(&err as &(dyn std::error::Error + 'static)),
        |e| e.source(),
    )
    .any(|e| e.is::<LengthLimitError>());

    if over_limit {
        RequestError::PayloadTooLarge { limit }
    } else {
        RequestError::MalformedBody {
            reason: format!("failed to read body: {err}"),
        }
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn recognises_json_content_types() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("Application/JSON")));
        assert!(is_json_content_type(&headers("application/merge-patch+json")));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&headers("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[test]
    fn blank_body_parses_as_empty_object() {
        assert_eq!(parse(b"", true).unwrap(), json!({}));
        assert_eq!(parse(b"  \n", true).unwrap(), json!({}));
    }

    #[test]
    fn strict_mode_rejects_scalars() {
        assert!(matches!(parse(b"42", true), Err(RequestError::MalformedBody { .. })));
        assert_eq!(parse(b"42", false).unwrap(), json!(42));
        assert_eq!(parse(b"[1, 2]", true).unwrap(), json!([1, 2]));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse(b"{\"name\": ", true).unwrap_err();
        assert!(matches!(err, RequestError::MalformedBody { .. }));
    }

    #[test]
    fn default_config() {
        let config = BodyParserConfig::default();
        assert_eq!(config.limit, 102_400);
        assert!(config.strict);
    }
}
