//! Sort keys for the results list.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::flight::FlightRecord;

/// How to order filtered results.
///
/// [`SortKey::Unsorted`] stands in for any key the board does not recognize:
/// results keep their filtered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Cheapest first.
    #[default]
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Shortest first.
    DurationAsc,
    /// Earliest departure first.
    DepartAsc,
    /// Earliest arrival first.
    ArriveAsc,
    /// Keep filtered order.
    Unsorted,
}

impl SortKey {
    /// The options offered on the sort bar, in display order.
    pub const BAR_OPTIONS: [Self; 4] = [
        Self::PriceAsc,
        Self::DurationAsc,
        Self::DepartAsc,
        Self::ArriveAsc,
    ];

    /// Every recognized key.
    pub const ALL: [Self; 5] = [
        Self::PriceAsc,
        Self::PriceDesc,
        Self::DurationAsc,
        Self::DepartAsc,
        Self::ArriveAsc,
    ];

    /// The wire key, as used in URLs and configuration.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::PriceAsc => "priceAsc",
            Self::PriceDesc => "priceDesc",
            Self::DurationAsc => "durationAsc",
            Self::DepartAsc => "departAsc",
            Self::ArriveAsc => "arriveAsc",
            Self::Unsorted => "unsorted",
        }
    }

    /// Human-readable label for the sort bar.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PriceAsc => "Price Low to high",
            Self::PriceDesc => "Price High to low",
            Self::DurationAsc => "Duration Shortest First",
            Self::DepartAsc => "Depart Earliest First",
            Self::ArriveAsc => "Arrival Earliest First",
            Self::Unsorted => "Unsorted",
        }
    }

    /// Parse a key leniently: anything unrecognized is [`SortKey::Unsorted`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            tracing::debug!(key, "unrecognized sort key, keeping filtered order");
            Self::Unsorted
        })
    }

    /// Sort `records` in place. The sort is stable, so ties keep their
    /// filtered order.
    pub fn sort(&self, records: &mut [FlightRecord]) {
        let compare: fn(&FlightRecord, &FlightRecord) -> Ordering = match self {
            Self::PriceAsc => |a, b| a.price.total_cmp(&b.price),
            Self::PriceDesc => |a, b| b.price.total_cmp(&a.price),
            Self::DurationAsc => |a, b| a.duration_minutes.total_cmp(&b.duration_minutes),
            Self::DepartAsc => |a, b| a.departure_time.cmp(&b.departure_time),
            Self::ArriveAsc => |a, b| a.arrival_time.cmp(&b.arrival_time),
            Self::Unsorted => return,
        };
        records.sort_by(compare);
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.key() == s)
            .ok_or_else(|| Error::unknown_sort_key(s))
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
