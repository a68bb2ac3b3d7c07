//! Command-line interface for flightboard.
//!
//! This module provides the CLI structure for the `flightboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, NormalizeCommand, OutputFormat, RecentCommand, ResultsCommand, SearchCommand,
    StatusCommand,
};

/// flightboard - Browse and search a flight results board
///
/// Loads a flight dataset in any of its known shapes, normalizes it, and
/// shows a filtered, sorted board. Searches are remembered as recent
/// searches.
#[derive(Debug, Parser)]
#[command(name = "flightboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the filtered, sorted results board
    Results(ResultsCommand),

    /// Submit a search and list matching outbound and inbound flights
    Search(SearchCommand),

    /// List or clear recent searches
    #[command(subcommand)]
    Recent(RecentCommand),

    /// Print the dataset as normalized flight records
    Normalize(NormalizeCommand),

    /// Show dataset and storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "flightboard");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_results_defaults() {
        let cli = Cli::try_parse_from(["flightboard", "results"]).unwrap();
        let Command::Results(cmd) = cli.command else {
            panic!("expected results command");
        };
        assert!(cmd.url.is_none());
        assert!(cmd.sort.is_none());
        assert_eq!(cmd.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_results_filters() {
        let cli = Cli::try_parse_from([
            "flightboard",
            "results",
            "-o",
            "del",
            "--return",
            "2025-12-05",
            "--min-price",
            "4000",
            "--max-price",
            "6000",
            "--sort",
            "durationAsc",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Results(cmd) = cli.command else {
            panic!("expected results command");
        };
        assert_eq!(cmd.origin.as_deref(), Some("del"));
        assert_eq!(cmd.ret.as_deref(), Some("2025-12-05"));
        assert_eq!(cmd.min_price, Some(4000.0));
        assert_eq!(cmd.max_price, Some(6000.0));
        assert_eq!(cmd.sort.as_deref(), Some("durationAsc"));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_results_url_conflicts_with_filters() {
        let result = Cli::try_parse_from([
            "flightboard",
            "results",
            "--url",
            "http://localhost/flights?origin=DEL",
            "--origin",
            "BOM",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "flightboard",
            "search",
            "DEL",
            "BOM",
            "--depart",
            "2025-12-01",
            "-a",
            "3",
        ])
        .unwrap();
        let Command::Search(cmd) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(cmd.origin, "DEL");
        assert_eq!(cmd.destination, "BOM");
        assert_eq!(cmd.depart.as_deref(), Some("2025-12-01"));
        assert!(cmd.ret.is_none());
        assert_eq!(cmd.adults, Some(3));
    }

    #[test]
    fn test_parse_search_requires_route() {
        assert!(Cli::try_parse_from(["flightboard", "search", "DEL"]).is_err());
    }

    #[test]
    fn test_parse_recent() {
        let cli = Cli::try_parse_from(["flightboard", "recent", "list", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Recent(RecentCommand::List { json: true })
        ));

        let cli = Cli::try_parse_from(["flightboard", "recent", "clear"]).unwrap();
        assert!(matches!(cli.command, Command::Recent(RecentCommand::Clear)));
    }

    #[test]
    fn test_parse_normalize_with_dataset() {
        let cli =
            Cli::try_parse_from(["flightboard", "normalize", "--dataset", "flights.json"]).unwrap();
        let Command::Normalize(cmd) = cli.command else {
            panic!("expected normalize command");
        };
        assert_eq!(cmd.dataset, Some(PathBuf::from("flights.json")));
        assert!(!cmd.json);
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["flightboard", "config", "validate", "-f", "board.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["flightboard", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["flightboard", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["flightboard", "status", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
