//! Array-or-object coercion for compute payload collections.
//!
//! The compute API ships the same logical collection either as a JSON array
//! or as an object keyed by name (`{"Sun": {...}, "Moon": {...}}`), and
//! sometimes as a lone value. `Collection` names those shapes so every
//! section reshapes through one helper.

use serde_json::{Map, Value};

/// Borrowed view of a JSON node that should be treated as a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collection<'a> {
    /// Missing key or explicit `null`
    Absent,
    /// JSON array, passed through in order
    Seq(&'a [Value]),
    /// JSON object, values taken in key order
    Keyed(&'a Map<String, Value>),
    /// Any other non-null value, treated as a one-element sequence
    Single(&'a Value),
}

impl<'a> Collection<'a> {
    /// Classify a node.
    pub fn of(node: Option<&'a Value>) -> Self {
        match node {
            None | Some(Value::Null) => Collection::Absent,
            Some(Value::Array(items)) => Collection::Seq(items),
            Some(Value::Object(map)) => Collection::Keyed(map),
            Some(other) => Collection::Single(other),
        }
    }

    /// Value sequence for this node.
    pub fn items(self) -> Vec<&'a Value> {
        match self {
            Collection::Absent => Vec::new(),
            Collection::Seq(items) => items.iter().collect(),
            Collection::Keyed(map) => map.values().collect(),
            Collection::Single(value) => vec![value],
        }
    }

    /// `(key, value)` pairs. Array positions become "0", "1", ...
    pub fn entries(self) -> Vec<(String, &'a Value)> {
        match self {
            Collection::Absent => Vec::new(),
            Collection::Seq(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Collection::Keyed(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Collection::Single(value) => vec![("0".to_string(), value)],
        }
    }

    pub fn len(self) -> usize {
        match self {
            Collection::Absent => 0,
            Collection::Seq(items) => items.len(),
            Collection::Keyed(map) => map.len(),
            Collection::Single(_) => 1,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Shorthand for `Collection::of(node).items()`.
pub fn to_seq(node: Option<&Value>) -> Vec<&Value> {
    Collection::of(node).items()
}

/// Drop empty results so views can test presence instead of length.
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
