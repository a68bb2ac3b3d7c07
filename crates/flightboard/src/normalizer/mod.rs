//! Normalizer: reconciles the dataset shapes we know about into a single
//! ordered sequence of [`FlightRecord`]s.
//!
//! Shapes are tried in priority order:
//!
//! 1. a top-level array of flat flight objects,
//! 2. an object whose `flights` field is such an array,
//! 3. anything else: every array found under a key named `j`, at any depth,
//!    is treated as a list of compact journey entries.
//!
//! Input order is preserved. Unknown shapes produce an empty sequence rather
//! than an error.
//!
//! # Example
//!
//! ```
//! use flightboard::normalizer::normalize;
//! use serde_json::json;
//!
//! let records = normalize(&json!([{"fr": "DEL", "to": "BOM", "farepr": "4500", "stp": 1}]));
//! assert_eq!(records[0].origin, "DEL");
//! assert_eq!(records[0].price, 4500.0);
//! assert_eq!(records[0].stops, 1);
//! ```

pub mod aliases;
pub mod coerce;

use serde_json::Value;
use tracing::debug;

use crate::flight::FlightRecord;

pub use aliases::{Accessor, AliasTable, FLAT, J_ENTRY};

/// Which dataset shape the normalizer recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Nothing to normalize (`null`).
    Empty,
    /// A top-level array of flat objects.
    FlatArray,
    /// An object with a `flights` array.
    FlightsField,
    /// Nested `j` arrays found by scanning the tree.
    NestedJourneys,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::FlatArray => write!(f, "flat array"),
            Self::FlightsField => write!(f, "flights array"),
            Self::NestedJourneys => write!(f, "nested journeys"),
        }
    }
}

/// Normalize a raw dataset into flight records.
#[must_use]
pub fn normalize(raw: &Value) -> Vec<FlightRecord> {
    normalize_with_shape(raw).1
}

/// Normalize a raw dataset and report which shape was used.
#[must_use]
pub fn normalize_with_shape(raw: &Value) -> (Shape, Vec<FlightRecord>) {
    let (shape, records) = match raw {
        Value::Null => (Shape::Empty, Vec::new()),
        Value::Array(items) => (Shape::FlatArray, map_entries(&FLAT, items.iter())),
        _ => match raw.get("flights") {
            Some(Value::Array(items)) => (Shape::FlightsField, map_entries(&FLAT, items.iter())),
            _ => (
                Shape::NestedJourneys,
                map_entries(&J_ENTRY, journey_entries(raw).into_iter()),
            ),
        },
    };

    debug!(shape = %shape, records = records.len(), "normalized dataset");
    (shape, records)
}

fn map_entries<'a>(
    table: &AliasTable,
    entries: impl Iterator<Item = &'a Value>,
) -> Vec<FlightRecord> {
    entries.map(|entry| table.map(entry)).collect()
}

/// Collect the elements of every `j` array in the tree, in discovery order.
///
/// Depth-first over object values and array elements, using an explicit
/// stack. A node that holds a `j` array contributes its entries and is not
/// descended into further. `Value` is a tree, so no visited set is needed.
#[must_use]
pub fn journey_entries(root: &Value) -> Vec<&Value> {
    let mut found = Vec::new();
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        match node {
            Value::Object(map) => {
                if let Some(Value::Array(entries)) = map.get("j") {
                    found.extend(entries.iter());
                    continue;
                }
                // Reversed so the first key is popped first.
                pending.extend(map.values().rev());
            }
            Value::Array(items) => pending.extend(items.iter().rev()),
            _ => {}
        }
    }

    found
}
