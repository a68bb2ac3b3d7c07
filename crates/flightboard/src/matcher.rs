//! Search-submission matcher.
//!
//! Unlike the display pipeline, this works on the raw `flights` entries and
//! uses exact, case-insensitive route matching. It runs once per submitted
//! search form and produces the outbound and (optional) inbound sets.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::normalizer::coerce::to_text;

/// One exact-match query over raw flight entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Origin code; empty matches any.
    pub origin: String,
    /// Destination code; empty matches any.
    pub destination: String,
    /// Date prefix; empty matches any.
    pub date: String,
}

impl SearchQuery {
    /// Build a query from its three parts.
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            date: date.into(),
        }
    }

    /// Whether `entry` satisfies this query.
    #[must_use]
    pub fn matches(&self, entry: &Value) -> bool {
        let origin = norm(&self.origin);
        let destination = norm(&self.destination);
        let date = self.date.trim();

        if !origin.is_empty() && norm(&text_field(entry, "origin")) != origin {
            return false;
        }
        if !destination.is_empty() && norm(&text_field(entry, "destination")) != destination {
            return false;
        }
        if !date.is_empty() {
            let entry_date = entry_date(entry);
            if entry_date.is_empty() || !entry_date.starts_with(date) {
                return false;
            }
        }
        true
    }
}

/// Outbound and inbound results of a submitted search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Origin to destination on the departure date.
    pub outbound: Vec<Value>,
    /// Destination to origin on the return date; empty for one-way searches.
    pub inbound: Vec<Value>,
}

impl SearchResults {
    /// Whether both sets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.inbound.is_empty()
    }
}

/// Keep the entries of `flights` that satisfy `query`, in input order.
#[must_use]
pub fn filter_flights(flights: &[Value], query: &SearchQuery) -> Vec<Value> {
    flights
        .iter()
        .filter(|entry| query.matches(entry))
        .cloned()
        .collect()
}

/// Run a submitted search. The inbound set is computed only when
/// `return_date` is non-empty, with origin and destination swapped.
#[must_use]
pub fn match_search(
    flights: &[Value],
    origin: &str,
    destination: &str,
    depart: &str,
    return_date: &str,
) -> SearchResults {
    let outbound = filter_flights(flights, &SearchQuery::new(origin, destination, depart));
    let inbound = if return_date.trim().is_empty() {
        Vec::new()
    } else {
        filter_flights(flights, &SearchQuery::new(destination, origin, return_date))
    };

    debug!(
        origin,
        destination,
        depart,
        return_date,
        outbound = outbound.len(),
        inbound = inbound.len(),
        "matched search"
    );
    SearchResults { outbound, inbound }
}

fn norm(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Scalar fields are rendered as text; missing and null fields are "".
fn text_field(entry: &Value, key: &str) -> String {
    entry.get(key).map(to_text).unwrap_or_default()
}

/// The entry's `date`, else the date part of `departureTime`.
fn entry_date(entry: &Value) -> String {
    let date = text_field(entry, "date");
    if !date.is_empty() {
        return date;
    }
    let departure = text_field(entry, "departureTime");
    match departure.split_once('T') {
        Some((day, _)) => day.to_string(),
        None => departure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use serde_json::json;

    fn flights() -> Vec<Value> {
        Dataset::bundled().unwrap().raw_flights().to_vec()
    }

    fn ids(entries: &[Value]) -> Vec<&str> {
        entries.iter().filter_map(|e| e["id"].as_str()).collect()
    }

    #[test]
    fn test_exact_route_match_ignores_case_and_whitespace() {
        let flights = flights();
        let result = filter_flights(&flights, &SearchQuery::new(" del", "bom ", ""));
        assert_eq!(ids(&result), ["AI-101", "6E-203", "UK-955"]);
    }

    #[test]
    fn test_route_match_is_not_substring() {
        let entries = vec![json!({"origin": "DELHI", "destination": "BOM"})];
        assert!(filter_flights(&entries, &SearchQuery::new("DEL", "", "")).is_empty());
    }

    #[test]
    fn test_date_from_date_field_or_departure_time() {
        let flights = flights();
        let result = filter_flights(&flights, &SearchQuery::new("BOM", "DEL", "2025-12-05"));
        assert_eq!(ids(&result), ["SG-8169", "AI-864"]);

        let result = filter_flights(&flights, &SearchQuery::new("", "", "2025-12"));
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn test_date_rejects_entries_without_date() {
        let entries = vec![
            json!({"origin": "DEL", "destination": "BOM"}),
            json!({"origin": "DEL", "destination": "BOM", "departureTime": "2025-12-01"}),
        ];
        let result = filter_flights(&entries, &SearchQuery::new("", "", "2025-12-01"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["departureTime"], "2025-12-01");

        // Without a date query the undated entry is kept.
        assert_eq!(filter_flights(&entries, &SearchQuery::default()).len(), 2);
    }

    #[test]
    fn test_match_search_one_way() {
        let flights = flights();
        let results = match_search(&flights, "DEL", "BOM", "2025-12-01", "");
        assert_eq!(results.outbound.len(), 3);
        assert!(results.inbound.is_empty());
    }

    #[test]
    fn test_match_search_round_trip() {
        let flights = flights();
        let results = match_search(&flights, "DEL", "BOM", "2025-12-01", "2025-12-05");
        assert_eq!(results.outbound.len(), 3);
        assert_eq!(ids(&results.inbound), ["SG-8169", "AI-864"]);

        let results = match_search(&flights, "BOM", "DEL", "2025-12-05", "2025-12-01");
        assert_eq!(ids(&results.outbound), ["SG-8169", "AI-864"]);
        assert_eq!(ids(&results.inbound), ["AI-101", "6E-203", "UK-955"]);
    }

    #[test]
    fn test_non_object_entries_never_match_a_route() {
        let entries = vec![json!("DEL"), json!(null)];
        assert!(filter_flights(&entries, &SearchQuery::new("DEL", "", "")).is_empty());
        assert_eq!(filter_flights(&entries, &SearchQuery::default()).len(), 2);
        assert!(match_search(&[], "DEL", "BOM", "", "").is_empty());
    }
}
