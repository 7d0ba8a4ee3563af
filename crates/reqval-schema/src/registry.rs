//! # Additional-Schema Registry
//!
//! Holds the schemas a primary schema may reference via `$ref`, keyed by
//! their `$id`. The registry doubles as the engine's reference retriever,
//! so references resolve from memory only: no network requests and no
//! permissive placeholder for unknown URIs, and no guessing by file
//! name. An unknown URI fails compilation.

use std::collections::HashMap;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

use crate::error::SchemaError;

/// Ordered set of schemas addressable by `$id`.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Value>,
    order: Vec<String>,
}

impl SchemaRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every schema in list order.
    pub fn from_schemas<'a>(
        schemas: impl IntoIterator<Item = &'a Value>,
    ) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema.clone())?;
        }
        Ok(registry)
    }

    /// Register one schema under its `$id` and return that id.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MissingSchemaId`] when the schema has no string `$id`,
    /// [`SchemaError::DuplicateSchemaId`] when the id is already taken.
    pub fn register(&mut self, schema: Value) -> Result<&str, SchemaError> {
        let id = schema
            .get("$id")
            .and_then(Value::as_str)
            .map(|id| id.trim_end_matches('#').to_string())
            .filter(|id| !id.is_empty())
            .ok_or(SchemaError::MissingSchemaId {
                index: self.order.len(),
            })?;

        if self.schemas.contains_key(&id) {
            return Err(SchemaError::DuplicateSchemaId(id));
        }

        tracing::trace!(schema_id = %id, "registered additional schema");
        self.schemas.insert(id.clone(), schema);
        self.order.push(id);
        Ok(self.order.last().map(String::as_str).unwrap_or_default())
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Look up a schema by its exact `$id`.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.schemas.get(id)
    }

    /// Resolve a reference URI.
    ///
    /// Only an exact `$id` match resolves. The engine resolves a relative
    /// `$id` such as `person.json` against its default base, so a request
    /// for `json-schema:///person.json` also answers to a registered
    /// relative `person.json`. An absolute URI never falls back to a
    /// schema registered under a different URI.
    pub fn resolve(&self, uri: &str) -> Option<&Value> {
        let uri = uri.trim_end_matches('#');
        if let Some(schema) = self.schemas.get(uri) {
            return Some(schema);
        }
        let relative = uri.strip_prefix(DEFAULT_BASE_URI)?;
        if relative.is_empty() || has_scheme(relative) {
            return None;
        }
        self.schemas.get(relative)
    }
}

/// Base the engine resolves schemas without an absolute `$id` against.
const DEFAULT_BASE_URI: &str = "json-schema:///";

/// `scheme:` prefix per RFC 3986.
fn has_scheme(reference: &str) -> bool {
    reference.split_once(':').is_some_and(|(scheme, _)| {
        scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

impl Retrieve for SchemaRegistry {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.resolve(uri_str)
            .cloned()
            .ok_or_else(|| format!("no registered schema for reference {uri_str}").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registers_in_order() {
        let schemas = [
            json!({"$id": "https://example.com/b.json"}),
            json!({"$id": "https://example.com/a.json"}),
        ];
        let registry = SchemaRegistry::from_schemas(&schemas).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            ["https://example.com/b.json", "https://example.com/a.json"]
        );
    }

    #[test]
    fn schema_without_id_is_rejected_with_its_index() {
        let schemas = [json!({"$id": "https://example.com/a.json"}), json!({"type": "object"})];
        let err = SchemaRegistry::from_schemas(&schemas).unwrap_err();
        assert!(matches!(err, SchemaError::MissingSchemaId { index: 1 }));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(json!({"$id": "https://example.com/a.json"})).unwrap();
        let err = registry
            .register(json!({"$id": "https://example.com/a.json#"}))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateSchemaId(id) if id == "https://example.com/a.json"));
    }

    #[test]
    fn resolves_exact_and_relative_ids() {
        let mut registry = SchemaRegistry::new();
        registry.register(json!({"$id": "person.json", "type": "object"})).unwrap();
        registry
            .register(json!({"$id": "https://example.com/schemas/address.json"}))
            .unwrap();

        assert!(registry.resolve("person.json").is_some());
        assert!(registry.resolve("json-schema:///person.json").is_some());
        assert!(registry.resolve("https://example.com/schemas/address.json#").is_some());
        assert!(registry.resolve("https://example.com/schemas/unknown.json").is_none());
        assert!(registry.resolve("https://example.com/").is_none());
        assert!(registry.resolve("json-schema:///").is_none());
    }

    #[test]
    fn same_file_name_under_another_uri_does_not_resolve() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(json!({"$id": "https://reqval.dev/schemas/person.json"}))
            .unwrap();
        registry.register(json!({"$id": "address.json"})).unwrap();

        assert!(registry.resolve("https://other.example/v2/person.json").is_none());
        assert!(registry.resolve("json-schema:///person.json").is_none());
        assert!(registry.resolve("https://other.example/address.json").is_none());
        assert!(registry.resolve("json-schema:///nested/address.json").is_none());
    }

    #[test]
    fn scheme_detection() {
        assert!(has_scheme("https://a/b.json"));
        assert!(has_scheme("urn:example:person"));
        assert!(!has_scheme("person.json"));
        assert!(!has_scheme("schemas/person.json"));
        assert!(!has_scheme("1x:y"));
    }

    #[test]
    fn empty_registry() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }
}
