//! The closed set of shapes an Airtable field value can take, and how each
//! one collapses into a printable [`Cell`].
//!
//! Airtable hands back plain scalars for most field types, arrays for linked
//! records, lookups and multi-selects, and objects for computed fields such as
//! AI-generated text (`{"state": "generated", "value": "...", "isStale": false}`).
//! [`FieldValue::classify`] sorts a raw JSON value into one of those shapes and
//! [`FieldValue::extract`] turns it into a cell without ever failing.

use std::fmt;

use serde_json::{Map, Number, Value};

/// Separator used when a list-valued field is flattened into one cell.
pub const LIST_DELIMITER: &str = ", ";

/// Key under which wrapper objects carry their actual value.
pub const WRAPPER_VALUE_KEY: &str = "value";

/// Fallback key for collaborators and select options.
pub const WRAPPER_NAME_KEY: &str = "name";

/// A single printable value in a normalised row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Cell {
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    /// True for the empty string only; `false` and `0` are values.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Text(text) if text.is_empty())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(number) => write!(f, "{number}"),
            // Matches the capitalised booleans of the existing CSV exports.
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

/// A raw field value, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Key missing from the record, or an explicit JSON null.
    Absent,
    Scalar(Cell),
    /// Object carrying its value under [`WRAPPER_VALUE_KEY`], or failing
    /// that [`WRAPPER_NAME_KEY`]. `None` when neither holds a non-null value.
    Wrapper(Option<&'a Value>),
    /// Linked records, lookups and multi-selects.
    List(&'a [Value]),
}

impl<'a> FieldValue<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(Value::String(text)) => FieldValue::Scalar(Cell::Text(text.clone())),
            Some(Value::Number(number)) => FieldValue::Scalar(Cell::Number(number.clone())),
            Some(Value::Bool(flag)) => FieldValue::Scalar(Cell::Bool(*flag)),
            Some(Value::Object(map)) => FieldValue::Wrapper(wrapped(map)),
            Some(Value::Array(items)) => FieldValue::List(items),
        }
    }

    /// Collapse into a cell, substituting `default` wherever nothing usable is present.
    pub fn extract(self, default: &Cell) -> Cell {
        match self {
            FieldValue::Absent => default.clone(),
            FieldValue::Scalar(cell) => cell,
            FieldValue::Wrapper(Some(inner)) => FieldValue::classify(Some(inner)).extract(default),
            FieldValue::Wrapper(None) => default.clone(),
            FieldValue::List(items) => Cell::Text(join_list(items)),
        }
    }
}

fn wrapped(map: &Map<String, Value>) -> Option<&Value> {
    [WRAPPER_VALUE_KEY, WRAPPER_NAME_KEY]
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|inner| !inner.is_null())
}

fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .filter_map(list_element)
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}

fn list_element(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(Cell::Bool(*flag).to_string()),
        Value::Array(nested) => Some(join_list(nested)),
        // A list keeps unrecognised objects as JSON rather than dropping them.
        Value::Object(map) => match wrapped(map) {
            Some(inner) => list_element(inner),
            None => Some(item.to_string()),
        },
    }
}
