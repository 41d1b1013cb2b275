//! Domain types of the accounting front-end.

use serde_json::Value;

pub mod column;
pub mod invoice;
pub mod ledger;
pub mod list_view;
pub mod module;
pub mod product;
pub mod record;
pub mod types;

/// Reads `key` from a JSON object as display text; numbers are stringified.
pub(crate) fn text_field(object: &Value, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn bool_field(object: &Value, key: &str) -> bool {
    match object.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// First row of the named result table, if any.
pub(crate) fn first_row<'a>(details: &'a Value, table: &str) -> Option<&'a Value> {
    details
        .get(table)
        .and_then(Value::as_array)
        .and_then(|rows| rows.first())
}
