//! Row field accessors
//!
//! Report rows come back as JSON maps. MySQL DECIMAL columns may arrive
//! as numbers or as numeric strings depending on the driver, so the
//! numeric accessors accept both. Missing or malformed fields read as
//! zero/empty; the roll-up code treats them as absent rather than failing
//! the whole report.

use serde_json::Value;

use crate::domain::reports::Row;

pub(crate) fn num(row: &Row, key: &str) -> f64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn int(row: &Row, key: &str) -> i64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| num_as_i64(n)),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn num_as_i64(n: &serde_json::Number) -> i64 {
    n.as_f64().map(|f| f as i64).unwrap_or(0)
}

pub(crate) fn text(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Clone a field verbatim, `null` when absent.
pub(crate) fn field(row: &Row, key: &str) -> Value {
    row.get(key).cloned().unwrap_or(Value::Null)
}

/// Legacy money formatting: two decimal places, as a string.
pub(crate) fn money(v: f64) -> String {
    format!("{v:.2}")
}

/// Treat a `json!({..})` object literal as a row.
pub(crate) fn row(value: Value) -> Row {
    value.as_object().cloned().unwrap_or_default()
}

/// Add to a numeric accumulator field on a roll-up row.
pub(crate) fn add_num(target: &mut Row, key: &str, delta: f64) {
    let current = num(target, key);
    target.insert(key.to_string(), Value::from(current + delta));
}

/// Append to an array field on a roll-up row.
pub(crate) fn push_item(target: &mut Row, key: &str, item: Value) {
    if let Some(Value::Array(items)) = target.get_mut(key) {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn num_accepts_numbers_and_decimal_strings() {
        let r = row(json!({"a": 1.5, "b": "2.25", "c": null}));
        assert_eq!(num(&r, "a"), 1.5);
        assert_eq!(num(&r, "b"), 2.25);
        assert_eq!(num(&r, "c"), 0.0);
        assert_eq!(num(&r, "missing"), 0.0);
    }

    #[test]
    fn int_accepts_strings() {
        let r = row(json!({"qty": "42"}));
        assert_eq!(int(&r, "qty"), 42);
    }

    #[test]
    fn money_keeps_two_decimals() {
        assert_eq!(money(3.0), "3.00");
        assert_eq!(money(1234.567), "1234.57");
    }
}
