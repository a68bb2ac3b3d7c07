//! A browsing session over one dataset.
//!
//! [`SearchSession`] holds the board state: the normalized records, the
//! price bounds and selected range, the sort key, the search parameters
//! read from the current URL, the URL history, and the event bus. Search
//! parameters are only ever read from the current URL, so navigation and
//! submission both go through the history.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::events::{EventBus, SearchEvent, SubmittedParams, DEFAULT_CAPACITY};
use crate::flight::FlightRecord;
use crate::matcher::{match_search, SearchResults};
use crate::pipeline::{self, PriceRange, SearchParams, SortKey};
use crate::query::{search_url, SearchForm};
use crate::recent::{RecentSearch, DEFAULT_MAX_RECENT};
use crate::storage::Storage;

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Sort key at startup and after clearing filters.
    pub sort: SortKey,
    /// Recent searches kept on submit.
    pub max_recent: usize,
    /// Largest adult count a submitted form may carry.
    pub max_adults: u32,
    /// Event channel capacity.
    pub event_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            sort: SortKey::default(),
            max_recent: DEFAULT_MAX_RECENT,
            max_adults: 7,
            event_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SessionOptions {
    /// Options taken from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            sort: config.default_sort(),
            max_recent: config.storage.max_recent,
            max_adults: config.search.max_adults,
            ..Self::default()
        }
    }
}

/// Board state for one user session.
#[derive(Debug)]
pub struct SearchSession {
    dataset: Dataset,
    records: Arc<[FlightRecord]>,
    bounds: PriceRange,
    range: PriceRange,
    sort: SortKey,
    params: SearchParams,
    history: Vec<Url>,
    events: EventBus,
    options: SessionOptions,
}

impl SearchSession {
    /// Start a session at `start`, reading search parameters from its query.
    #[must_use]
    pub fn new(dataset: Dataset, start: Url, options: SessionOptions) -> Self {
        let records = dataset.records();
        let bounds = PriceRange::spanning(&records);
        let params = SearchParams::from_url(&start);
        debug!(
            records = records.len(),
            bounds = %bounds,
            "Starting session at {start}"
        );

        Self {
            dataset,
            records,
            bounds,
            range: bounds,
            sort: options.sort,
            params,
            history: vec![start],
            events: EventBus::new(options.event_capacity),
            options,
        }
    }

    /// Start a session from configuration: its base URL and sort key.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL does not parse.
    pub fn from_config(config: &Config, dataset: Dataset) -> Result<Self> {
        Ok(Self::new(
            dataset,
            config.base_url()?,
            SessionOptions::from_config(config),
        ))
    }

    /// The filtered, sorted records for the current state.
    #[must_use]
    pub fn results(&self) -> Vec<FlightRecord> {
        pipeline::apply(&self.records, self.range, &self.params, self.sort)
    }

    /// The dataset this session browses.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The `[min, max]` price over all records.
    #[must_use]
    pub fn price_bounds(&self) -> PriceRange {
        self.bounds
    }

    /// The selected price range.
    #[must_use]
    pub fn price_range(&self) -> PriceRange {
        self.range
    }

    /// The active sort key.
    #[must_use]
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// The search parameters in effect.
    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// The current URL.
    #[must_use]
    pub fn current_url(&self) -> &Url {
        // history is never empty: `new` seeds it and `back` keeps the first entry.
        &self.history[self.history.len() - 1]
    }

    /// Number of entries in the URL history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The event bus; subscribe to observe submissions.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// A search form prefilled from the current URL.
    #[must_use]
    pub fn form(&self) -> SearchForm {
        SearchForm::from_url(self.current_url())
    }

    /// Select a price range. Reversed bounds are swapped and the range is
    /// kept within the dataset's bounds.
    pub fn set_price_range(&mut self, low: f64, high: f64) {
        self.range = PriceRange::new(low, high).clamp_to(self.bounds);
        debug!(range = %self.range, "price range changed");
    }

    /// Select a sort key.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        debug!(sort = %sort, "sort changed");
    }

    /// Replace the search parameters directly, without touching the URL.
    pub fn set_search_params(&mut self, params: SearchParams) {
        self.params = params;
    }

    /// Reset the price range to the bounds, the sort to its startup key,
    /// and the search parameters to empty.
    pub fn clear_filters(&mut self) {
        self.range = self.bounds;
        self.sort = self.options.sort;
        self.params = SearchParams::default();
        debug!("filters cleared");
    }

    /// Go to `url` and re-read the search parameters from it.
    pub fn navigate(&mut self, url: Url) {
        self.history.push(url);
        self.read_params();
    }

    /// Go back one URL and re-read the search parameters. Returns `false`
    /// when already at the first URL.
    pub fn back(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        self.history.pop();
        self.read_params();
        true
    }

    /// Submit the search form.
    ///
    /// Pushes the search URL, records the recent search, matches the raw
    /// dataset, then emits [`SearchEvent::ResultsChanged`] followed by
    /// [`SearchEvent::SearchChanged`]. A failure to record the recent search
    /// is logged and does not stop the submission.
    pub fn submit(&mut self, form: &SearchForm, storage: &Storage) -> SearchResults {
        let mut form = form.clone();
        form.adults = form.adults.clamp(1, self.options.max_adults.max(1));

        let url = search_url(self.current_url(), &form);
        self.history.push(url);

        if let Err(e) = storage.save_recent(&form.recent(), self.options.max_recent) {
            warn!("Failed to save recent search: {e}");
        }

        let results = match_search(
            self.dataset.raw_flights(),
            &form.origin,
            &form.destination,
            &form.depart,
            &form.ret_depart,
        );
        info!(
            outbound = results.outbound.len(),
            inbound = results.inbound.len(),
            "Search submitted: {} → {}",
            form.origin,
            form.destination
        );

        self.events.emit(SearchEvent::ResultsChanged {
            results: results.clone(),
            params: SubmittedParams {
                origin: form.origin.clone(),
                destination: form.destination.clone(),
                depart: form.depart.clone(),
                ret: form.ret_depart.clone(),
                adults: form.adults,
            },
        });
        self.events.emit(SearchEvent::SearchChanged);
        self.read_params();

        results
    }

    /// The stored recent searches, most recent first.
    #[must_use]
    pub fn recent(&self, storage: &Storage) -> Vec<RecentSearch> {
        storage.load_recent(self.options.max_recent)
    }

    fn read_params(&mut self) {
        self.params = SearchParams::from_url(self.current_url());
        debug!(params = ?self.params, "search params read from URL");
    }
}
