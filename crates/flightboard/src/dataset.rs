//! The raw flight dataset.
//!
//! A dataset is kept in its raw JSON form because two consumers need it: the
//! normalizer (run once at load) and the search-submission matcher, which
//! works on the raw `flights` entries directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flight::FlightRecord;
use crate::normalizer::{self, Shape};

/// The dataset shipped with the binary.
pub const BUNDLED_DATASET: &str = include_str!("../data/flights.json");

/// A loaded dataset together with its normalized records.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: Option<PathBuf>,
    raw: Arc<Value>,
    shape: Shape,
    records: Arc<[FlightRecord]>,
}

impl Dataset {
    /// Build a dataset from an already-parsed JSON value.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        let (shape, records) = normalizer::normalize_with_shape(&raw);
        Self {
            source: None,
            raw: Arc::new(raw),
            shape,
            records: records.into(),
        }
    }

    /// The dataset bundled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON is malformed.
    pub fn bundled() -> Result<Self> {
        let raw: Value = serde_json::from_str(BUNDLED_DATASET)?;
        Ok(Self::from_value(raw))
    }

    /// Load a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading dataset from {}", path.display());

        let text = std::fs::read_to_string(path).map_err(|source| Error::DatasetRead {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: Value = serde_json::from_str(&text).map_err(|source| Error::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut dataset = Self::from_value(raw);
        dataset.source = Some(path.to_path_buf());
        info!(
            records = dataset.records.len(),
            shape = %dataset.shape,
            "Loaded dataset from {}",
            path.display()
        );
        Ok(dataset)
    }

    /// Load from `path` when given, otherwise use the bundled dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    /// Where the dataset was loaded from (`None` for bundled or in-memory data).
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The raw `flights` entries, or an empty slice when the document has
    /// no top-level `flights` array.
    #[must_use]
    pub fn raw_flights(&self) -> &[Value] {
        match self.raw.get("flights") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// The shape the normalizer recognized.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The normalized records, shared read-only.
    #[must_use]
    pub fn records(&self) -> Arc<[FlightRecord]> {
        Arc::clone(&self.records)
    }

    /// Number of normalized records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset produced no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundled_dataset() {
        let dataset = Dataset::bundled().unwrap();
        assert_eq!(dataset.shape(), Shape::FlightsField);
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.raw_flights().len(), 6);
        assert!(dataset.source().is_none());
    }

    #[test]
    fn test_raw_flights_missing() {
        let dataset = Dataset::from_value(json!([{"fr": "DEL"}]));
        assert_eq!(dataset.len(), 1);
        assert!(dataset.raw_flights().is_empty());

        let dataset = Dataset::from_value(json!({"flights": "none"}));
        assert!(dataset.is_empty());
        assert!(dataset.raw_flights().is_empty());
    }

    #[test]
    fn test_records_are_shared() {
        let dataset = Dataset::bundled().unwrap();
        let a = dataset.records();
        let b = dataset.records();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dataset::load("/nonexistent/flights.json").unwrap_err();
        assert!(matches!(err, Error::DatasetRead { .. }));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!(
            "flightboard_dataset_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"flights": [{"origin": "GOI", "price": 3100}]}"#).unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.source(), Some(path.as_path()));

        std::fs::write(&path, "{ not json").unwrap();
        let err = Dataset::load(&path).unwrap_err();
        assert!(matches!(err, Error::DatasetParse { .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_bundled() {
        let dataset = Dataset::load_or_bundled(None).unwrap();
        assert_eq!(dataset.len(), 6);
    }
}
