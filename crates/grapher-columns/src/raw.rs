//! Borrowed view of an unparsed input cell.

use serde_json::Value;

/// A raw cell as handed to [`ColumnType::parse`](crate::ColumnType::parse).
///
/// Delimited input only ever produces `Text`; JSON rows can produce any
/// variant. Arrays and objects have no cell meaning and arrive as `Null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawCell<'a> {
    Null,
    Text(&'a str),
    Number(f64),
    Boolean(bool),
}

impl RawCell<'_> {
    /// Null or whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Null => true,
            RawCell::Text(text) => text.trim().is_empty(),
            RawCell::Number(_) | RawCell::Boolean(_) => false,
        }
    }
}

impl<'a> From<&'a str> for RawCell<'a> {
    fn from(value: &'a str) -> Self {
        RawCell::Text(value)
    }
}

impl<'a> From<&'a String> for RawCell<'a> {
    fn from(value: &'a String) -> Self {
        RawCell::Text(value.as_str())
    }
}

impl<'a> From<&'a Value> for RawCell<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(text) => RawCell::Text(text),
            Value::Number(number) => number.as_f64().map_or(RawCell::Null, RawCell::Number),
            Value::Bool(flag) => RawCell::Boolean(*flag),
            Value::Null | Value::Array(_) | Value::Object(_) => RawCell::Null,
        }
    }
}
