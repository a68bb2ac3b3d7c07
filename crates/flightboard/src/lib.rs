//! `flightboard` - A flight search results board
//!
//! This library normalizes flight datasets of several shapes into one record
//! type, filters and sorts them for display, matches searches against the raw
//! dataset, and remembers recent searches in `SQLite`.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod events;
pub mod flight;
pub mod logging;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod query;
pub mod recent;
pub mod render;
pub mod session;
pub mod storage;

pub use config::Config;
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use events::{EventBus, SearchEvent};
pub use flight::FlightRecord;
pub use logging::init_logging;
pub use matcher::{match_search, SearchResults};
pub use pipeline::{PriceRange, SearchParams, SortKey};
pub use query::SearchForm;
pub use recent::RecentSearch;
pub use render::Renderer;
pub use session::{SearchSession, SessionOptions};
pub use storage::{Storage, StorageStats};
