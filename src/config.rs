//! Command line options and the settings a run is driven by.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::logger::LogSeverity;

/// What to do when a map block cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run and return the first block error.
    Abort,
    /// Log the error, list the block in the report and carry on.
    SkipAndContinue,
}

#[derive(Debug, Parser)]
#[command(name = "nodestats", about = "Count the nodes of every type in a saved world")]
pub struct Cli {
    /// World directory containing map.sqlite, or the database file itself
    pub world: PathBuf,

    /// Map blocks decoded in parallel (defaults to the number of CPUs)
    #[arg(long, short)]
    pub jobs: Option<NonZeroUsize>,

    /// Skip map blocks that fail to decode instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Lowest severity that gets logged
    #[arg(long, value_enum, default_value_t = LogSeverity::Info)]
    pub log_level: LogSeverity,
}

/// Settings of one statistics run.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Upper bound on map blocks being decoded at the same time.
    pub jobs: usize,
    pub policy: FailurePolicy,
    /// Minimum time between two progress lines.
    pub progress_interval: Duration,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            jobs: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            policy: FailurePolicy::Abort,
            progress_interval: Duration::from_secs(1),
        }
    }
}

impl From<&Cli> for StatsConfig {
    fn from(cli: &Cli) -> Self {
        let defaults = StatsConfig::default();
        Self {
            jobs: cli.jobs.map(NonZeroUsize::get).unwrap_or(defaults.jobs),
            policy: if cli.keep_going {
                FailurePolicy::SkipAndContinue
            } else {
                FailurePolicy::Abort
            },
            ..defaults
        }
    }
}
