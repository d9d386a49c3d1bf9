//! Configuration system with YAML schema and validation.
//!
//! Implements Poka-Yoke (mistake-proofing) through:
//! - Type-safe configuration structs
//! - Schema validation via `validator`
//! - Runtime semantic validation

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use validator::Validate;

use crate::engine::jidoka::SortGuard;
use crate::engine::rng::{new_baseline, DEFAULT_MAX, DEFAULT_MIN, DEFAULT_SIZE};
use crate::engine::scheduler::SchedulingMode;
use crate::engine::SimTime;
use crate::error::{RaceError, RaceResult};
use crate::sort::Algorithm;

/// Top-level race configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RaceConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Baseline array generation.
    #[validate(nested)]
    #[serde(default)]
    pub baseline: BaselineConfig,

    /// Contestants and scheduling.
    #[validate(nested)]
    #[serde(default)]
    pub race: RaceSettings,

    /// Tick cadence.
    #[validate(nested)]
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Jidoka finished-array guard.
    #[serde(default)]
    pub guard: GuardConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl RaceConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> RaceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> RaceResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> RaceResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> RaceConfigBuilder {
        RaceConfigBuilder::default()
    }

    /// Run schema and semantic validation.
    ///
    /// Needed after programmatic changes such as command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate_all(&self) -> RaceResult<()> {
        // Poka-Yoke: validate all constraints
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> RaceResult<()> {
        if self.baseline.min > self.baseline.max {
            return Err(RaceError::config(format!(
                "baseline.min ({}) must not exceed baseline.max ({})",
                self.baseline.min, self.baseline.max
            )));
        }

        let tolerance = self.race.tie_tolerance_ms;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(RaceError::config(format!(
                "race.tie_tolerance_ms must be finite and non-negative, got {tolerance}"
            )));
        }
        if tolerance > 0.0 && self.race.mode == SchedulingMode::Sequential {
            warn!("race.tie_tolerance_ms = {tolerance} is ignored in sequential mode");
        }

        if self.playback.interval_millis() == 0 {
            return Err(RaceError::config(format!(
                "tick interval is zero: base_interval_ms {} / speed {}",
                self.playback.base_interval_ms, self.playback.speed
            )));
        }

        Ok(())
    }

    /// Generate the configured baseline.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value range is empty.
    pub fn baseline(&self) -> RaceResult<Vec<i64>> {
        new_baseline(
            self.baseline.size,
            self.baseline.min,
            self.baseline.max,
            self.baseline.seed,
        )
    }

    /// Lockstep tie window.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tolerance is negative or not finite.
    pub fn tie_tolerance(&self) -> RaceResult<SimTime> {
        SimTime::try_from_millis_f64(self.race.tie_tolerance_ms)
    }

    /// Duration of one tick.
    #[must_use]
    pub const fn tick_interval(&self) -> SimTime {
        SimTime::from_millis(self.playback.interval_millis())
    }

    /// Finished-array guard.
    #[must_use]
    pub const fn sort_guard(&self) -> SortGuard {
        SortGuard::new(self.guard.enabled)
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            baseline: BaselineConfig::default(),
            race: RaceSettings::default(),
            playback: PlaybackConfig::default(),
            guard: GuardConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct RaceConfigBuilder {
    seed: Option<u64>,
    size: Option<usize>,
    left: Option<Algorithm>,
    right: Option<Algorithm>,
    mode: Option<SchedulingMode>,
    speed: Option<u32>,
    clock: Option<ClockKind>,
    tie_tolerance_ms: Option<f64>,
    guard: Option<bool>,
}

impl RaceConfigBuilder {
    /// Set the baseline seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the baseline length.
    #[must_use]
    pub const fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the algorithm on track A.
    #[must_use]
    pub const fn left(mut self, algorithm: Algorithm) -> Self {
        self.left = Some(algorithm);
        self
    }

    /// Set the algorithm on track B.
    #[must_use]
    pub const fn right(mut self, algorithm: Algorithm) -> Self {
        self.right = Some(algorithm);
        self
    }

    /// Set the scheduling mode.
    #[must_use]
    pub const fn mode(mut self, mode: SchedulingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the playback speed multiplier.
    #[must_use]
    pub const fn speed(mut self, speed: u32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set the clock source.
    #[must_use]
    pub const fn clock(mut self, clock: ClockKind) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the lockstep tie window in milliseconds.
    #[must_use]
    pub const fn tie_tolerance_ms(mut self, tolerance: f64) -> Self {
        self.tie_tolerance_ms = Some(tolerance);
        self
    }

    /// Enable or disable the finished-array guard.
    #[must_use]
    pub const fn guard(mut self, enabled: bool) -> Self {
        self.guard = Some(enabled);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RaceConfig {
        let mut config = RaceConfig::default();

        if let Some(seed) = self.seed {
            config.baseline.seed = seed;
        }
        if let Some(size) = self.size {
            config.baseline.size = size;
        }
        if let Some(left) = self.left {
            config.race.left = left;
        }
        if let Some(right) = self.right {
            config.race.right = right;
        }
        if let Some(mode) = self.mode {
            config.race.mode = mode;
        }
        if let Some(speed) = self.speed {
            config.playback.speed = speed;
        }
        if let Some(clock) = self.clock {
            config.playback.clock = clock;
        }
        if let Some(tolerance) = self.tie_tolerance_ms {
            config.race.tie_tolerance_ms = tolerance;
        }
        if let Some(enabled) = self.guard {
            config.guard.enabled = enabled;
        }

        config
    }
}

/// Baseline array generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BaselineConfig {
    /// Number of elements.
    #[validate(range(max = 10000))]
    #[serde(default = "default_size")]
    pub size: usize,
    /// Smallest value (inclusive).
    #[serde(default = "default_min")]
    pub min: i64,
    /// Largest value (inclusive).
    #[serde(default = "default_max")]
    pub max: i64,
    /// Seed for the PCG stream.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

const fn default_size() -> usize {
    DEFAULT_SIZE
}

const fn default_min() -> i64 {
    DEFAULT_MIN
}

const fn default_max() -> i64 {
    DEFAULT_MAX
}

const fn default_seed() -> u64 {
    42
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            min: default_min(),
            max: default_max(),
            seed: default_seed(),
        }
    }
}

/// Contestants and scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RaceSettings {
    /// Algorithm on track A.
    #[serde(default)]
    pub left: Algorithm,
    /// Algorithm on track B.
    #[serde(default = "default_right")]
    pub right: Algorithm,
    /// How the tracks share ticks.
    #[serde(default)]
    pub mode: SchedulingMode,
    /// Lockstep tie window in milliseconds.
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub tie_tolerance_ms: f64,
}

const fn default_right() -> Algorithm {
    Algorithm::Quick
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            left: Algorithm::default(),
            right: default_right(),
            mode: SchedulingMode::default(),
            tie_tolerance_ms: 0.0,
        }
    }
}

/// Tick cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Speed multiplier; the tick interval is `base_interval_ms / speed`.
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_speed")]
    pub speed: u32,
    /// Tick interval at speed 1.
    #[validate(range(min = 1))]
    #[serde(default = "default_base_interval")]
    pub base_interval_ms: u64,
    /// Time source for elapsed measurements.
    #[serde(default)]
    pub clock: ClockKind,
}

const fn default_speed() -> u32 {
    1
}

const fn default_base_interval() -> u64 {
    100
}

impl PlaybackConfig {
    /// Tick interval in whole milliseconds (integer division).
    #[must_use]
    pub const fn interval_millis(&self) -> u64 {
        if self.speed == 0 {
            return self.base_interval_ms;
        }
        self.base_interval_ms / self.speed as u64
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            base_interval_ms: default_base_interval(),
            clock: ClockKind::default(),
        }
    }
}

/// Time source for a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockKind {
    /// Fixed timestep per tick; reproducible.
    #[default]
    Simulated,
    /// Real elapsed time; the caller sleeps between ticks.
    Wall,
}

impl fmt::Display for ClockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulated => f.write_str("simulated"),
            Self::Wall => f.write_str("wall"),
        }
    }
}

impl FromStr for ClockKind {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" => Ok(Self::Simulated),
            "wall" | "real" => Ok(Self::Wall),
            other => Err(RaceError::config(format!(
                "unknown clock '{other}' (expected simulated or wall)"
            ))),
        }
    }
}

/// Jidoka guard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Check every finished array against the sorted baseline.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}
