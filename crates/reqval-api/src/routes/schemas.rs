//! # Embedded Schemas
//!
//! The demo schemas are compiled into the binary; nothing is read from
//! disk at runtime.

use reqval_schema::SchemaError;
use serde_json::Value;

const PERSON: &str = include_str!("../../schemas/person.json");
const EMPLOYEE: &str = include_str!("../../schemas/employee.json");

/// `person.json`: `{name: non-empty string, age: number >= 0}`.
pub fn person() -> Result<Value, SchemaError> {
    embedded("person.json", PERSON)
}

/// `employee.json`: a person (by `$ref`) with an `employeeId`.
pub fn employee() -> Result<Value, SchemaError> {
    embedded("employee.json", EMPLOYEE)
}

fn embedded(name: &str, text: &str) -> Result<Value, SchemaError> {
    serde_json::from_str(text).map_err(|e| SchemaError::Compile {
        reason: format!("embedded schema {name} is not valid JSON: {e}"),
    })
}
