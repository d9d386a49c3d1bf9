//! Race engine.
//!
//! Everything between the step producers and the caller's cadence:
//! - Fixed-point race time and pluggable tick clocks
//! - Deterministic baseline generation (PCG)
//! - Tracks with per-track timing windows
//! - The dual-track scheduler and its outcome
//! - Jidoka guard for stop-on-error

pub mod clock;
pub mod jidoka;
pub mod outcome;
pub mod rng;
pub mod scheduler;
pub mod track;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use clock::{SimClock, TickClock, WallClock};
pub use jidoka::SortGuard;
pub use outcome::{RaceOutcome, Verdict};
pub use rng::{new_baseline, SimRng};
pub use scheduler::{DualTrackScheduler, RaceSnapshot, RaceState, SchedulingMode, TickReport};
pub use track::{Track, TrackEvent, TrackId, TrackStatus};

use crate::error::{RaceError, RaceResult};

/// Race time.
///
/// Uses a fixed-point representation for reproducibility across platforms.
/// Internal representation is in nanoseconds to avoid floating-point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimTime {
    /// Time in nanoseconds from the start of the comparison.
    nanos: u64,
}

impl SimTime {
    /// Zero time (comparison start).
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create time from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Create time from whole milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    /// Create time from fractional milliseconds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `millis` is negative or not finite.
    pub fn try_from_millis_f64(millis: f64) -> RaceResult<Self> {
        if !millis.is_finite() || millis < 0.0 {
            return Err(RaceError::config(format!(
                "time must be finite and non-negative, got {millis} ms"
            )));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = (millis * 1_000_000.0).round() as u64;
        Ok(Self { nanos })
    }

    /// Get time as seconds (f64).
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Get time as milliseconds (f64).
    #[must_use]
    pub fn as_millis_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000.0
    }

    /// Get time as nanoseconds.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Add duration to time.
    #[must_use]
    pub const fn add_nanos(self, nanos: u64) -> Self {
        Self {
            nanos: self.nanos.saturating_add(nanos),
        }
    }

    /// Absolute difference between two times.
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> Self {
        Self {
            nanos: self.nanos.abs_diff(other.nanos),
        }
    }
}

impl From<Duration> for SimTime {
    fn from(duration: Duration) -> Self {
        Self {
            nanos: u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

impl std::ops::Add for SimTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_nanos(rhs.nanos)
    }
}

impl std::ops::Sub for SimTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos.saturating_sub(rhs.nanos),
        }
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}ms", self.as_millis_f64())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: add then subtract is identity.
        #[test]
        fn prop_add_sub_identity(a in 0u64..1_000_000_000_000, b in 0u64..1_000_000_000_000) {
            let ta = SimTime::from_nanos(a);
            let tb = SimTime::from_nanos(b);
            prop_assert_eq!((ta + tb) - tb, ta);
        }

        /// Falsification: abs_diff is symmetric.
        #[test]
        fn prop_abs_diff_symmetric(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
            let ta = SimTime::from_nanos(a);
            let tb = SimTime::from_nanos(b);
            prop_assert_eq!(ta.abs_diff(tb), tb.abs_diff(ta));
        }
    }
}
