//! Diagnostics for the board.
//!
//! Everything here writes to stderr. Board listings and the `--json` /
//! `--format json` documents go to stdout, and piping them into `jq` must
//! never pick up a log line. Only `flightboard` events are shown at the chosen
//! level; dependencies are held at `warn`. Setting `RUST_LOG` replaces the
//! whole filter.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How chatty the CLI is on stderr, picked from `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// Dataset loads, database opens, submitted searches and recent-search
    /// failures.
    #[default]
    Normal,
    /// `-v`: adds the normalized shape, match counts and board state changes.
    Verbose,
    /// `-vv`: adds pipeline stage counts and event delivery.
    Trace,
}

impl Verbosity {
    /// Level applied to `flightboard` events.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Pick a verbosity from CLI flag counts. `quiet` wins over `verbose`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    ///
    /// Quiet drops dependency warnings too, so `-q` leaves stderr empty
    /// unless something failed.
    #[must_use]
    pub fn directive(&self) -> String {
        match self {
            Self::Quiet => "error".to_string(),
            _ => format!("warn,flightboard={}", self.to_level_filter()),
        }
    }
}

/// Choose the filter: a parseable `RUST_LOG` value wins, otherwise the
/// verbosity directive.
fn build_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directive()))
}

/// Install the stderr subscriber. Later calls are no-ops.
///
/// # Examples
///
/// ```no_run
/// use flightboard::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbosity, rust_log.as_deref());

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Warn-level logging routed through the test harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
