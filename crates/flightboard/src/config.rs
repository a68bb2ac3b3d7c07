//! Configuration management for flightboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::pipeline::SortKey;
use crate::recent::DEFAULT_MAX_RECENT;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightboard";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "recent.db";

/// Prefix for environment overrides. Nested keys are separated by `__`,
/// e.g. `FLIGHTBOARD_STORAGE__MAX_RECENT=10`.
pub const ENV_PREFIX: &str = "FLIGHTBOARD_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTBOARD_`)
/// 2. TOML config file at `~/.config/flightboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset configuration.
    pub data: DataConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Search configuration.
    pub search: SearchConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Dataset-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to a JSON dataset. Uses the bundled dataset when unset.
    pub dataset_path: Option<PathBuf>,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/flightboard/recent.db`
    pub database_path: Option<PathBuf>,
    /// Number of recent searches to keep.
    pub max_recent: usize,
}

/// Search-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Sort key applied at startup.
    pub default_sort: String,
    /// URL a session starts from; submitted searches keep its path.
    pub base_url: String,
    /// Adult count for a fresh form.
    pub default_adults: u32,
    /// Largest adult count the form accepts.
    pub max_adults: u32,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Symbol printed before prices.
    pub currency_symbol: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            max_recent: DEFAULT_MAX_RECENT,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_sort: SortKey::default().key().to_string(),
            base_url: "http://localhost/flights".to_string(),
            default_adults: 1,
            max_adults: 7,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults and environment
    /// variables still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The layered provider stack: defaults, then the TOML file, then the
    /// environment.
    #[must_use]
    pub fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_recent == 0 {
            return Err(Error::config_validation(
                "max_recent must be greater than 0",
            ));
        }

        if let Err(e) = self.search.default_sort.parse::<SortKey>() {
            return Err(Error::config_validation(format!("default_sort: {e}")));
        }

        if let Err(e) = Url::parse(&self.search.base_url) {
            return Err(Error::config_validation(format!(
                "base_url '{}' is not a valid URL: {e}",
                self.search.base_url
            )));
        }

        if self.search.max_adults == 0 {
            return Err(Error::config_validation(
                "max_adults must be greater than 0",
            ));
        }

        if !(1..=self.search.max_adults).contains(&self.search.default_adults) {
            return Err(Error::config_validation(format!(
                "default_adults ({}) must be between 1 and max_adults ({})",
                self.search.default_adults, self.search.max_adults
            )));
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The configured dataset path, if any.
    #[must_use]
    pub fn dataset_path(&self) -> Option<&Path> {
        self.data.dataset_path.as_deref()
    }

    /// The startup sort key. An unrecognized key keeps filtered order.
    #[must_use]
    pub fn default_sort(&self) -> SortKey {
        SortKey::from_key(&self.search.default_sort)
    }

    /// The parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `search.base_url` does not parse.
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.search.base_url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.data.dataset_path.is_none());
        assert_eq!(config.storage.max_recent, 6);
        assert_eq!(config.search.default_sort, "priceAsc");
        assert_eq!(config.search.default_adults, 1);
        assert_eq!(config.search.max_adults, 7);
        assert_eq!(config.display.currency_symbol, "₹");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_max_recent() {
        let mut config = Config::default();
        config.storage.max_recent = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_recent"));
    }

    #[test]
    fn test_validate_unknown_sort() {
        let mut config = Config::default();
        config.search.default_sort = "cheapest".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("unknown sort key 'cheapest'"));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = Config::default();
        config.search.base_url = "flights".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_validate_adults_bounds() {
        let mut config = Config::default();
        config.search.default_adults = 0;
        assert!(config.validate().is_err());

        config.search.default_adults = 8;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_adults"));

        config.search.default_adults = 7;
        assert!(config.validate().is_ok());

        config.search.max_adults = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("recent.db"));
        assert!(path.to_string_lossy().contains("flightboard"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_sort_and_base_url() {
        let config = Config::default();
        assert_eq!(config.default_sort(), SortKey::PriceAsc);
        assert_eq!(config.base_url().unwrap().path(), "/flights");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("flightboard"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .expect("defaults should load");
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "board.toml",
                r#"
                [storage]
                max_recent = 3

                [search]
                default_sort = "durationAsc"

                [display]
                currency_symbol = "Rs."
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("board.toml")))
                .expect("config should load");
            assert_eq!(config.storage.max_recent, 3);
            assert_eq!(config.default_sort(), SortKey::DurationAsc);
            assert_eq!(config.display.currency_symbol, "Rs.");
            assert_eq!(config.search.max_adults, 7);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("board.toml", "[storage]\nmax_recent = 3\n")?;
            jail.set_env("FLIGHTBOARD_STORAGE__MAX_RECENT", "9");
            jail.set_env("FLIGHTBOARD_SEARCH__DEFAULT_SORT", "arriveAsc");

            let config = Config::load_from(Some(PathBuf::from("board.toml")))
                .expect("config should load");
            assert_eq!(config.storage.max_recent, 9);
            assert_eq!(config.default_sort(), SortKey::ArriveAsc);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.create_file("board.toml", "[storage]\nmax_recent = 0\n")?;
            let err = Config::load_from(Some(PathBuf::from("board.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("board.toml", "[storage\nmax_recent = ")?;
            let err = Config::load_from(Some(PathBuf::from("board.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigLoad(_)));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("max_recent"));
        assert!(json.contains("currency_symbol"));
    }
}
