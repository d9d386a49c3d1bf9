//! CLI argument definitions.
//!
//! Every race option overrides the matching field of the loaded (or default)
//! configuration; the merged configuration is validated before use.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ClockKind, RaceConfig};
use crate::engine::SchedulingMode;
use crate::error::RaceResult;
use crate::sort::Algorithm;

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "sortrace",
    about = "Race two sorting algorithms step by step over the same baseline",
    disable_version_flag = true,
    arg_required_else_help = true
)]
pub struct Args {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI commands.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Run one race headless and print the result
    Race {
        #[command(flatten)]
        options: RaceOptions,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that a race replays bit-identically
    Verify {
        #[command(flatten)]
        options: RaceOptions,

        /// Number of runs to compare
        #[arg(long, default_value_t = 3)]
        runs: usize,
    },
    /// List the algorithm catalog
    List,
    /// Show version information
    Version,
}

/// Configuration source plus per-field overrides.
#[derive(Debug, Clone, Default, PartialEq, clap::Args)]
pub struct RaceOptions {
    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Algorithm on track A
    #[arg(long, value_name = "ALGORITHM")]
    pub left: Option<Algorithm>,

    /// Algorithm on track B
    #[arg(long, value_name = "ALGORITHM")]
    pub right: Option<Algorithm>,

    /// sequential or lockstep
    #[arg(short, long)]
    pub mode: Option<SchedulingMode>,

    /// Baseline length
    #[arg(long)]
    pub size: Option<usize>,

    /// Baseline seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Playback speed (1-10)
    #[arg(long)]
    pub speed: Option<u32>,

    /// simulated or wall
    #[arg(long)]
    pub clock: Option<ClockKind>,

    /// Lockstep tie window in milliseconds
    #[arg(long, value_name = "MS")]
    pub tolerance_ms: Option<f64>,
}

impl RaceOptions {
    /// Load the configuration file (or defaults) and apply the overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be loaded or the merged
    /// configuration is invalid.
    pub fn resolve(&self) -> RaceResult<RaceConfig> {
        let mut config = match &self.config {
            Some(path) => RaceConfig::load(path)?,
            None => RaceConfig::default(),
        };

        if let Some(left) = self.left {
            config.race.left = left;
        }
        if let Some(right) = self.right {
            config.race.right = right;
        }
        if let Some(mode) = self.mode {
            config.race.mode = mode;
        }
        if let Some(size) = self.size {
            config.baseline.size = size;
        }
        if let Some(seed) = self.seed {
            config.baseline.seed = seed;
        }
        if let Some(speed) = self.speed {
            config.playback.speed = speed;
        }
        if let Some(clock) = self.clock {
            config.playback.clock = clock;
        }
        if let Some(tolerance) = self.tolerance_ms {
            config.race.tie_tolerance_ms = tolerance;
        }

        config.validate_all()?;
        Ok(config)
    }
}
