//! The canonical flight record.
//!
//! Every dataset shape the normalizer understands ends up as a
//! [`FlightRecord`]. All fields carry a deterministic default so that the
//! pipeline and the renderer never have to deal with missing values.

use serde::{Deserialize, Serialize};

/// One normalized flight leg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightRecord {
    /// Origin airport code or city name.
    pub origin: String,

    /// Destination airport code or city name.
    pub destination: String,

    /// Departure as an ISO-8601 datetime or date; may be empty.
    pub departure_time: String,

    /// Arrival as an ISO-8601 datetime or date; may be empty.
    pub arrival_time: String,

    /// Block time in minutes, never negative.
    pub duration_minutes: f64,

    /// Fare, never negative.
    pub price: f64,

    /// Number of intermediate stops.
    pub stops: u32,

    /// Whether the fare is refundable.
    pub refundable: bool,

    /// Marketing airline name or code.
    pub airline: String,

    /// Flight number as published.
    pub flight_number: String,

    /// Explicit departure date, when the source carries one separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,

    /// Explicit arrival date, when the source carries one separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,

    /// Airline logo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl FlightRecord {
    /// The value the depart-date filter looks at: the explicit departure
    /// date when present and non-empty, otherwise the departure time.
    #[must_use]
    pub fn effective_departure(&self) -> &str {
        effective(self.departure_date.as_deref(), &self.departure_time)
    }

    /// The value the return-date filter looks at.
    #[must_use]
    pub fn effective_arrival(&self) -> &str {
        effective(self.arrival_date.as_deref(), &self.arrival_time)
    }

    /// Whether the flight has no intermediate stops.
    #[must_use]
    pub fn is_nonstop(&self) -> bool {
        self.stops == 0
    }
}

fn effective<'a>(explicit: Option<&'a str>, fallback: &'a str) -> &'a str {
    match explicit {
        Some(date) if !date.is_empty() => date,
        _ => fallback,
    }
}

/// First `n` characters of `value` (the `YYYY-MM-DD` part of an ISO string
/// when `n` is 10). Shorter strings are returned whole.
#[must_use]
pub fn leading_chars(value: &str, n: usize) -> &str {
    match value.char_indices().nth(n) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
