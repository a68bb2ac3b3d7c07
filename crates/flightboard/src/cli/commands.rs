//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for showing the filtered, sorted board.
#[derive(Debug, Args)]
pub struct ResultsCommand {
    /// Read origin/destination/depart/return from this URL's query string
    #[arg(long, conflicts_with_all = ["origin", "destination", "depart", "ret"])]
    pub url: Option<String>,

    /// Origin filter (case-insensitive substring)
    #[arg(short, long)]
    pub origin: Option<String>,

    /// Destination filter (case-insensitive substring)
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub depart: Option<String>,

    /// Return date (YYYY-MM-DD)
    #[arg(long = "return", value_name = "DATE")]
    pub ret: Option<String>,

    /// Lowest price to show
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Highest price to show
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sort key: priceAsc, priceDesc, durationAsc, departAsc, arriveAsc
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Dataset file (defaults to the configured or bundled dataset)
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,
}

/// Arguments for submitting a search.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Origin code
    pub origin: String,

    /// Destination code
    pub destination: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub depart: Option<String>,

    /// Return date (YYYY-MM-DD); searches inbound flights too
    #[arg(long = "return", value_name = "DATE")]
    pub ret: Option<String>,

    /// Number of adult passengers
    #[arg(short, long)]
    pub adults: Option<u32>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Dataset file (defaults to the configured or bundled dataset)
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,
}

/// Recent-search commands.
#[derive(Debug, Subcommand)]
pub enum RecentCommand {
    /// List recent searches, most recent first
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Forget all recent searches
    Clear,
}

/// Arguments for dumping normalized records.
#[derive(Debug, Args)]
pub struct NormalizeCommand {
    /// Dataset file (defaults to the configured or bundled dataset)
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
