//! Filter/sort pipeline over normalized records.
//!
//! [`apply`] runs the filter steps in a fixed order (price, origin,
//! destination, depart date, return date) and then sorts. Each text step is
//! skipped when its query is empty, so an all-default [`SearchParams`] with a
//! range spanning the dataset returns every record.

pub mod sort;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::flight::{leading_chars, FlightRecord};

pub use sort::SortKey;

/// Price range used when a dataset has no records.
pub const FALLBACK_RANGE: PriceRange = PriceRange {
    low: 0.0,
    high: 10_000.0,
};

/// An inclusive price range. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    low: f64,
    high: f64,
}

impl PriceRange {
    /// Build a range, swapping reversed bounds. Non-finite bounds become 0.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        let low = if low.is_finite() { low } else { 0.0 };
        let high = if high.is_finite() { high } else { 0.0 };
        if low <= high {
            Self { low, high }
        } else {
            Self {
                low: high,
                high: low,
            }
        }
    }

    /// The `[min, max]` price over `records`, or [`FALLBACK_RANGE`] when
    /// there are none.
    #[must_use]
    pub fn spanning(records: &[FlightRecord]) -> Self {
        let mut prices = records.iter().map(|r| r.price);
        let Some(first) = prices.next() else {
            return FALLBACK_RANGE;
        };
        let (low, high) = prices.fold((first, first), |(low, high), p| (low.min(p), high.max(p)));
        Self::new(low, high)
    }

    /// Lower bound.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Whether `price` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }

    /// Restrict this range to `bounds`. A range entirely outside collapses
    /// onto the nearest bound.
    #[must_use]
    pub fn clamp_to(&self, bounds: Self) -> Self {
        Self::new(
            self.low.clamp(bounds.low, bounds.high),
            self.high.clamp(bounds.low, bounds.high),
        )
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        FALLBACK_RANGE
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.low, self.high)
    }
}

/// The search parameters that drive the text and date filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    /// Origin substring (case-insensitive).
    pub origin: String,
    /// Destination substring (case-insensitive).
    pub destination: String,
    /// Departure date, `YYYY-MM-DD`.
    pub depart: String,
    /// Return date, `YYYY-MM-DD`.
    pub ret_depart: String,
}

impl SearchParams {
    /// Whether no filter field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origin.trim().is_empty()
            && self.destination.trim().is_empty()
            && self.depart.trim().is_empty()
            && self.ret_depart.trim().is_empty()
    }
}

/// Filter `records` by price, route, and dates, then sort by `sort`.
#[must_use]
pub fn apply(
    records: &[FlightRecord],
    range: PriceRange,
    params: &SearchParams,
    sort: SortKey,
) -> Vec<FlightRecord> {
    let origin = params.origin.trim().to_lowercase();
    let destination = params.destination.trim().to_lowercase();
    let depart = params.depart.trim();
    let ret_depart = params.ret_depart.trim();

    let mut matched: Vec<FlightRecord> = records
        .iter()
        .filter(|r| range.contains(r.price))
        .filter(|r| contains_folded(&r.origin, &origin))
        .filter(|r| contains_folded(&r.destination, &destination))
        .filter(|r| same_day(r.effective_departure(), depart))
        .filter(|r| same_day(r.effective_arrival(), ret_depart))
        .cloned()
        .collect();

    sort.sort(&mut matched);
    trace!(
        total = records.len(),
        matched = matched.len(),
        range = %range,
        sort = %sort,
        "applied pipeline"
    );
    matched
}

/// `needle` must already be trimmed and lowercased.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Records without a date value pass; otherwise the first 10 characters must
/// equal `date`.
fn same_day(value: &str, date: &str) -> bool {
    if date.is_empty() {
        return true;
    }
    let day = leading_chars(value, 10);
    day.is_empty() || day == date
}
