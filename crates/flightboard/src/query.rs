//! URL query state.
//!
//! The board's search state lives in the URL query string: `origin`,
//! `destination`, `depart`, `return` and `adult`. Reading is lenient (missing
//! keys are empty); writing replaces the whole query and marks the URL with
//! the `searched` fragment.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::pipeline::SearchParams;
use crate::recent::RecentSearch;

/// Fragment set on URLs pushed by a search submission.
pub const SEARCHED_FRAGMENT: &str = "searched";

/// Adult count used when the URL has none or an unusable one.
pub const DEFAULT_ADULTS: u32 = 1;

fn param(url: &Url, key: &str) -> String {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

impl SearchParams {
    /// Read the filter parameters from a URL's query string.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self {
            origin: param(url, "origin"),
            destination: param(url, "destination"),
            depart: param(url, "depart"),
            ret_depart: param(url, "return"),
        }
    }
}

/// The search form: route, dates and passenger count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchForm {
    /// Origin code.
    pub origin: String,
    /// Destination code.
    pub destination: String,
    /// Departure date.
    pub depart: String,
    /// Return date; empty for one-way.
    pub ret_depart: String,
    /// Number of adult passengers.
    pub adults: u32,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            depart: String::new(),
            ret_depart: String::new(),
            adults: DEFAULT_ADULTS,
        }
    }
}

impl SearchForm {
    /// Prefill the form from a URL. An `adult` value that is missing, not a
    /// number, or zero falls back to [`DEFAULT_ADULTS`].
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let params = SearchParams::from_url(url);
        let adults = param(url, "adult")
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_ADULTS);
        Self {
            origin: params.origin,
            destination: params.destination,
            depart: params.depart,
            ret_depart: params.ret_depart,
            adults,
        }
    }

    /// Exchange origin and destination.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }

    /// Fill the route and dates from a recent search, keeping the adult
    /// count.
    pub fn apply_recent(&mut self, recent: &RecentSearch) {
        self.origin.clone_from(&recent.origin);
        self.destination.clone_from(&recent.destination);
        self.depart.clone_from(&recent.depart);
        self.ret_depart.clone_from(&recent.ret_depart);
    }

    /// The filter parameters this form describes.
    #[must_use]
    pub fn params(&self) -> SearchParams {
        SearchParams {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            depart: self.depart.clone(),
            ret_depart: self.ret_depart.clone(),
        }
    }

    /// The entry recorded in the recent-search list.
    #[must_use]
    pub fn recent(&self) -> RecentSearch {
        RecentSearch {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            depart: self.depart.clone(),
            ret_depart: self.ret_depart.clone(),
        }
    }

    /// Query pairs in URL order. Empty route and date fields are left out;
    /// `adult` is always present.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("depart", &self.depart),
            ("return", &self.ret_depart),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect();
        pairs.push(("adult", self.adults.to_string()));
        pairs
    }
}

/// The URL pushed on submission: `current`'s path with the query replaced
/// by the form's pairs and the fragment set to [`SEARCHED_FRAGMENT`].
#[must_use]
pub fn search_url(current: &Url, form: &SearchForm) -> Url {
    let mut url = current.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in form.query_pairs() {
            query.append_pair(key, &value);
        }
    }
    url.set_fragment(Some(SEARCHED_FRAGMENT));
    url
}
