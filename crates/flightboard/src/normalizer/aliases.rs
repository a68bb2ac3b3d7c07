//! Field alias tables.
//!
//! Each target field of [`FlightRecord`] has an ordered list of candidate
//! accessors. The first candidate that resolves to a present, non-null value
//! wins; the value is then coerced to the field type. Tables are plain data
//! so they can be inspected and tested on their own.

use serde_json::Value;

use super::coerce::{to_count, to_flag, to_number, to_text};
use crate::flight::FlightRecord;

/// How to pull one candidate value out of a dataset entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// A top-level key.
    Key(&'static str),
    /// A chain of nested object keys.
    Path(&'static [&'static str]),
    /// The first element of an array-valued key, or the value itself when
    /// it is not an array.
    FirstOf(&'static str),
}

impl Accessor {
    /// Resolve this accessor against `entry`. `null` counts as absent.
    #[must_use]
    pub fn get<'a>(&self, entry: &'a Value) -> Option<&'a Value> {
        let found = match self {
            Self::Key(key) => entry.get(key),
            Self::Path(keys) => keys.iter().try_fold(entry, |node, key| node.get(key)),
            Self::FirstOf(key) => match entry.get(key)? {
                Value::Array(items) => items.first(),
                other => Some(other),
            },
        };
        found.filter(|value| !value.is_null())
    }
}

/// Resolve the first matching candidate.
#[must_use]
pub fn first_match<'a>(candidates: &[Accessor], entry: &'a Value) -> Option<&'a Value> {
    candidates.iter().find_map(|accessor| accessor.get(entry))
}

/// A complete mapping from one source shape to [`FlightRecord`]: one
/// candidate list per record field.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    /// Name used in log output.
    pub name: &'static str,
    pub origin: &'static [Accessor],
    pub destination: &'static [Accessor],
    pub departure_time: &'static [Accessor],
    pub arrival_time: &'static [Accessor],
    pub duration_minutes: &'static [Accessor],
    pub price: &'static [Accessor],
    pub stops: &'static [Accessor],
    pub refundable: &'static [Accessor],
    pub airline: &'static [Accessor],
    pub flight_number: &'static [Accessor],
    pub departure_date: &'static [Accessor],
    pub arrival_date: &'static [Accessor],
    pub logo: &'static [Accessor],
}

/// Flat flight objects, as found in a top-level array or under `flights`.
pub const FLAT: AliasTable = AliasTable {
    name: "flat",
    origin: &[Accessor::Key("origin"), Accessor::Key("fr")],
    destination: &[Accessor::Key("destination"), Accessor::Key("to")],
    departure_time: &[Accessor::Key("departureTime"), Accessor::Key("dt")],
    arrival_time: &[Accessor::Key("arrivalTime"), Accessor::Key("at")],
    duration_minutes: &[
        Accessor::Key("durationMinutes"),
        Accessor::Key("ft"),
        Accessor::Key("tt"),
    ],
    price: &[
        Accessor::Key("price"),
        Accessor::Key("farepr"),
        Accessor::Path(&["fare", "gross_fare", "value"]),
    ],
    stops: &[Accessor::Key("stp"), Accessor::Key("stops")],
    refundable: &[Accessor::Key("refundable")],
    airline: &[Accessor::Key("airline"), Accessor::FirstOf("al")],
    flight_number: &[
        Accessor::Key("flightNumber"),
        Accessor::Key("fn"),
        Accessor::Key("id"),
    ],
    // `date` is left to the submission matcher, which reads raw entries.
    departure_date: &[Accessor::Key("departureDate")],
    arrival_date: &[Accessor::Key("arrivalDate")],
    logo: &[Accessor::Key("logo")],
};

/// Entries of nested `j` arrays (compact journey format).
pub const J_ENTRY: AliasTable = AliasTable {
    name: "j-entry",
    origin: &[Accessor::Key("fr")],
    destination: &[Accessor::Key("to")],
    departure_time: &[Accessor::Key("dt")],
    arrival_time: &[Accessor::Key("at")],
    duration_minutes: &[Accessor::Key("tt")],
    price: &[Accessor::Key("farepr")],
    stops: &[Accessor::Key("stp")],
    refundable: &[],
    airline: &[Accessor::FirstOf("al")],
    flight_number: &[Accessor::Key("fn")],
    departure_date: &[],
    arrival_date: &[],
    logo: &[],
};

impl AliasTable {
    /// Map one dataset entry to a record. Non-object entries map to the
    /// all-defaults record.
    #[must_use]
    pub fn map(&self, entry: &Value) -> FlightRecord {
        let text = |candidates: &[Accessor]| {
            first_match(candidates, entry)
                .map(to_text)
                .unwrap_or_default()
        };
        let optional_text = |candidates: &[Accessor]| {
            first_match(candidates, entry)
                .map(to_text)
                .filter(|s| !s.is_empty())
        };

        FlightRecord {
            origin: text(self.origin),
            destination: text(self.destination),
            departure_time: text(self.departure_time),
            arrival_time: text(self.arrival_time),
            duration_minutes: first_match(self.duration_minutes, entry).map_or(0.0, to_number),
            price: first_match(self.price, entry).map_or(0.0, to_number),
            stops: first_match(self.stops, entry).map_or(0, to_count),
            refundable: first_match(self.refundable, entry).is_some_and(to_flag),
            airline: text(self.airline),
            flight_number: text(self.flight_number),
            departure_date: optional_text(self.departure_date),
            arrival_date: optional_text(self.arrival_date),
            logo: optional_text(self.logo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessor_key() {
        let entry = json!({"fr": "DEL", "to": null});
        assert_eq!(Accessor::Key("fr").get(&entry), Some(&json!("DEL")));
        assert_eq!(Accessor::Key("to").get(&entry), None);
        assert_eq!(Accessor::Key("missing").get(&entry), None);
    }

    #[test]
    fn test_accessor_path() {
        let entry = json!({"fare": {"gross_fare": {"value": 6120}}});
        let accessor = Accessor::Path(&["fare", "gross_fare", "value"]);
        assert_eq!(accessor.get(&entry), Some(&json!(6120)));

        let partial = json!({"fare": {"net": 10}});
        assert_eq!(accessor.get(&partial), None);
    }

    #[test]
    fn test_accessor_first_of() {
        let accessor = Accessor::FirstOf("al");
        assert_eq!(accessor.get(&json!({"al": ["UK", "AI"]})), Some(&json!("UK")));
        assert_eq!(accessor.get(&json!({"al": "6E"})), Some(&json!("6E")));
        assert_eq!(accessor.get(&json!({"al": []})), None);
    }

    #[test]
    fn test_accessor_on_non_object() {
        assert_eq!(Accessor::Key("fr").get(&json!("DEL")), None);
        assert_eq!(Accessor::Key("fr").get(&json!(42)), None);
    }

    #[test]
    fn test_first_match_order() {
        let entry = json!({"origin": "Delhi", "fr": "DEL"});
        assert_eq!(first_match(FLAT.origin, &entry), Some(&json!("Delhi")));

        let entry = json!({"origin": null, "fr": "DEL"});
        assert_eq!(first_match(FLAT.origin, &entry), Some(&json!("DEL")));
    }

    #[test]
    fn test_flat_price_candidates() {
        assert_eq!(FLAT.map(&json!({"price": 10, "farepr": 20})).price, 10.0);
        assert_eq!(FLAT.map(&json!({"farepr": "20"})).price, 20.0);
        assert_eq!(
            FLAT.map(&json!({"fare": {"gross_fare": {"value": "30.5"}}})).price,
            30.5
        );
        assert_eq!(FLAT.map(&json!({})).price, 0.0);
    }

    #[test]
    fn test_flat_first_present_candidate_wins_even_if_unparseable() {
        // `price` is present, so `farepr` is never consulted.
        let record = FLAT.map(&json!({"price": "call us", "farepr": 900}));
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn test_flat_duration_from_tt() {
        assert_eq!(FLAT.map(&json!({"tt": "145"})).duration_minutes, 145.0);
        assert_eq!(FLAT.map(&json!({"ft": 90, "tt": "145"})).duration_minutes, 90.0);
    }

    #[test]
    fn test_flat_flight_number_falls_back_to_id() {
        assert_eq!(FLAT.map(&json!({"id": "AI-101"})).flight_number, "AI-101");
        assert_eq!(FLAT.map(&json!({"fn": 203, "id": "x"})).flight_number, "203");
    }

    #[test]
    fn test_flat_optional_fields() {
        let record = FLAT.map(&json!({
            "departureDate": "2025-12-05",
            "arrivalDate": "2025-12-06",
            "logo": "https://example.test/ai.png"
        }));
        assert_eq!(record.departure_date.as_deref(), Some("2025-12-05"));
        assert_eq!(record.arrival_date.as_deref(), Some("2025-12-06"));
        assert_eq!(record.logo.as_deref(), Some("https://example.test/ai.png"));

        let record = FLAT.map(&json!({"logo": ""}));
        assert!(record.logo.is_none());
    }

    #[test]
    fn test_flat_date_field_is_not_a_departure_date() {
        let record = FLAT.map(&json!({
            "date": "2025-12-06",
            "departureTime": "2025-12-05T23:00:00"
        }));
        assert!(record.departure_date.is_none());
        assert_eq!(record.effective_departure(), "2025-12-05T23:00:00");
    }

    #[test]
    fn test_j_entry_table() {
        let record = J_ENTRY.map(&json!({
            "fr": "BLR", "to": "DEL", "dt": "2025-12-01T05:40", "at": "2025-12-01T10:20",
            "tt": "280", "farepr": 6890, "al": ["6E"], "stp": "1", "fn": "6021",
            "refundable": true, "origin": "ignored"
        }));
        assert_eq!(record.origin, "BLR");
        assert_eq!(record.destination, "DEL");
        assert_eq!(record.duration_minutes, 280.0);
        assert_eq!(record.price, 6890.0);
        assert_eq!(record.airline, "6E");
        assert_eq!(record.stops, 1);
        assert_eq!(record.flight_number, "6021");
        // The compact format has no refundable field.
        assert!(!record.refundable);
    }

    #[test]
    fn test_map_non_object_gives_defaults() {
        assert_eq!(FLAT.map(&json!("DEL-BOM")), FlightRecord::default());
        assert_eq!(J_ENTRY.map(&json!(null)), FlightRecord::default());
    }
}
