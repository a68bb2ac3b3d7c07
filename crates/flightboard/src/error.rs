//! Error types for flightboard.
//!
//! This module defines all error types used throughout the flightboard crate.
//! Data coercion never produces an error; only I/O-like boundaries do
//! (configuration, dataset loading, the recent-search database, URLs).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flightboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Dataset Errors ===
    /// The dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    DatasetRead {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The dataset file is not valid JSON.
    #[error("failed to parse dataset {path}: {source}")]
    DatasetParse {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Search Errors ===
    /// A sort key was not one of the known keys.
    #[error("unknown sort key '{key}'")]
    UnknownSortKey {
        /// The key as given.
        key: String,
    },

    /// A URL could not be parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flightboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an unknown sort key error.
    #[must_use]
    pub fn unknown_sort_key(key: impl Into<String>) -> Self {
        Self::UnknownSortKey { key: key.into() }
    }
}
