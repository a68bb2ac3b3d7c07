//! Plain-text rendering of the results board.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::flight::FlightRecord;
use crate::pipeline::{PriceRange, SortKey};

/// Shown in place of the list when nothing matches.
pub const NO_RESULTS: &str = "No flights found for selected filters";

/// Marker for the active sort option.
pub const ACTIVE_MARK: char = '▼';

/// Marker for inactive sort options.
pub const INACTIVE_MARK: char = '△';

/// `"{h}h {m}m"` from minutes, rounded to the nearest minute. Non-finite
/// input renders as "".
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn minutes_to_hours(minutes: f64) -> String {
    if !minutes.is_finite() {
        return String::new();
    }
    let total = minutes.round() as i64;
    format!("{}h {}m", total.div_euclid(60), total.rem_euclid(60))
}

/// `HH:MM` from an ISO-8601 datetime, with or without an offset. A bare
/// date is midnight. Unparseable input is returned unchanged.
#[must_use]
pub fn time_only(iso: &str) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return String::new();
    }

    let time = DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(iso, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        });

    match time {
        Ok(t) => format!("{:02}:{:02}", t.hour(), t.minute()),
        Err(_) => iso.to_string(),
    }
}

/// Badge text for an airline: the first two letters of a one-word name,
/// otherwise the initials of up to three words. "—" when empty.
#[must_use]
pub fn airline_initials(airline: &str) -> String {
    let words: Vec<&str> = airline.split_whitespace().collect();
    match words.as_slice() {
        [] => "—".to_string(),
        [word] => word.chars().take(2).collect::<String>().to_uppercase(),
        _ => words
            .iter()
            .filter_map(|w| w.chars().next())
            .take(3)
            .collect::<String>()
            .to_uppercase(),
    }
}

/// `"Non-stop"`, `"1 Stop"` or `"N Stops"`.
#[must_use]
pub fn stops_label(stops: u32) -> String {
    match stops {
        0 => "Non-stop".to_string(),
        1 => "1 Stop".to_string(),
        n => format!("{n} Stops"),
    }
}

/// Renders board pieces with a given currency symbol.
#[derive(Debug, Clone)]
pub struct Renderer {
    currency_symbol: String,
}

impl Renderer {
    /// Create a renderer that prefixes prices with `currency_symbol`.
    #[must_use]
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    /// A price with the currency symbol, e.g. `₹5400`.
    #[must_use]
    pub fn price(&self, price: f64) -> String {
        format!("{}{price}", self.currency_symbol)
    }

    /// One result row.
    #[must_use]
    pub fn card(&self, flight: &FlightRecord) -> String {
        format!(
            "{badge:<3} {airline:<14} {dep:>5} {origin:<5} {duration:>8} {stops:<9} {arr:>5} {destination:<5} {price:>9}",
            badge = airline_initials(&flight.airline),
            airline = flight.airline,
            dep = time_only(&flight.departure_time),
            origin = flight.origin,
            duration = minutes_to_hours(flight.duration_minutes),
            stops = stops_label(flight.stops),
            arr = time_only(&flight.arrival_time),
            destination = flight.destination,
            price = self.price(flight.price),
        )
    }

    /// The result list, or [`NO_RESULTS`] when empty.
    #[must_use]
    pub fn list(&self, flights: &[FlightRecord]) -> String {
        if flights.is_empty() {
            return NO_RESULTS.to_string();
        }
        flights
            .iter()
            .map(|f| self.card(f))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The selected price range, e.g. `Min: ₹4250  Max: ₹7350`.
    #[must_use]
    pub fn price_summary(&self, range: PriceRange) -> String {
        format!(
            "Min: {}  Max: {}",
            self.price(range.low()),
            self.price(range.high())
        )
    }

    /// The sort bar with the active option marked.
    #[must_use]
    pub fn sort_bar(&self, current: SortKey) -> String {
        SortKey::BAR_OPTIONS
            .iter()
            .map(|option| {
                let mark = if *option == current {
                    ACTIVE_MARK
                } else {
                    INACTIVE_MARK
                };
                format!("{} {mark}", option.label())
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// The whole board: price summary, sort bar, result count and list.
    #[must_use]
    pub fn board(&self, flights: &[FlightRecord], range: PriceRange, sort: SortKey) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.price_summary(range));
        let _ = writeln!(out, "{}", self.sort_bar(sort));
        let _ = writeln!(out, "{}", result_count(flights.len()));
        out.push('\n');
        out.push_str(&self.list(flights));
        out
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("₹")
    }
}

/// `"1 flight"` / `"N flights"`.
#[must_use]
pub fn result_count(n: usize) -> String {
    if n == 1 {
        "1 flight".to_string()
    } else {
        format!("{n} flights")
    }
}
