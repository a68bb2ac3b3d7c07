//! Recent-search entries.
//!
//! A recent search is the route and dates of a submitted form. Two entries
//! are the same entry when all four fields are equal; storage identifies
//! them by a BLAKE3 hash of their canonical JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Key under which the recent-search list is kept.
pub const RECENT_KEY: &str = "aertrip_recent_searches";

/// Default number of recent searches kept.
pub const DEFAULT_MAX_RECENT: usize = 6;

/// One remembered search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentSearch {
    /// Origin as typed.
    pub origin: String,
    /// Destination as typed.
    pub destination: String,
    /// Departure date.
    pub depart: String,
    /// Return date; empty for one-way.
    pub ret_depart: String,
}

impl RecentSearch {
    /// Canonical JSON: fixed key order, no whitespace.
    #[must_use]
    pub fn canonical_json(&self) -> String {
        json!({
            "origin": self.origin,
            "destination": self.destination,
            "depart": self.depart,
            "retDepart": self.ret_depart,
        })
        .to_string()
    }

    /// BLAKE3 hash of the canonical JSON, hex-encoded.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        blake3::hash(self.canonical_json().as_bytes())
            .to_hex()
            .to_string()
    }

    /// Short route label, e.g. `DEL → BOM`.
    #[must_use]
    pub fn route(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

impl std::fmt::Display for RecentSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.route())?;
        if !self.depart.is_empty() {
            write!(f, "  {}", self.depart)?;
        }
        if !self.ret_depart.is_empty() {
            write!(f, " / {}", self.ret_depart)?;
        }
        Ok(())
    }
}

/// A recent search as stored, with when it was last submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRecent {
    /// Row id; larger is more recent.
    pub id: i64,
    /// The entry itself.
    #[serde(flatten)]
    pub search: RecentSearch,
    /// When the entry was last submitted.
    pub searched_at: DateTime<Utc>,
}
