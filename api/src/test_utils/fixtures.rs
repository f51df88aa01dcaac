//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use serde_json::{json, Value};

use crate::domain::reports::Row;

/// Build a result row from a JSON object literal.
///
/// Panics if the value is not an object; fixtures are always literals.
pub fn sale_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture row must be a JSON object, got {other}"),
    }
}

/// A user row shaped like the legacy `users` table select.
pub fn user_row(email: &str, password_digest: &str) -> Row {
    sale_row(json!({
        "userid": 7,
        "email": email,
        "password": password_digest,
        "loccode": "HQ",
        "username": "clerk",
        "roleid": 3,
    }))
}
