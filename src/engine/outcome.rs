//! Race results and winner resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::scheduler::SchedulingMode;
use crate::engine::track::TrackId;
use crate::engine::SimTime;
use crate::sort::Algorithm;

/// Who won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The track with the strictly smaller elapsed time.
    Winner(TrackId),
    /// Equal elapsed times (within tolerance in lockstep mode).
    Tie,
}

impl Verdict {
    /// Resolve two elapsed times.
    ///
    /// Sequential runs tie only on exact equality. Lockstep runs tie when the
    /// difference is at most `tolerance`.
    #[must_use]
    pub fn resolve(
        mode: SchedulingMode,
        elapsed_a: SimTime,
        elapsed_b: SimTime,
        tolerance: SimTime,
    ) -> Self {
        let window = match mode {
            SchedulingMode::Sequential => SimTime::ZERO,
            SchedulingMode::Lockstep => tolerance,
        };
        if elapsed_a.abs_diff(elapsed_b) <= window {
            Self::Tie
        } else if elapsed_a < elapsed_b {
            Self::Winner(TrackId::A)
        } else {
            Self::Winner(TrackId::B)
        }
    }

    /// The winning track, if any.
    #[must_use]
    pub const fn winner(self) -> Option<TrackId> {
        match self {
            Self::Winner(id) => Some(id),
            Self::Tie => None,
        }
    }

    /// Whether this is a tie.
    #[must_use]
    pub const fn is_tie(self) -> bool {
        matches!(self, Self::Tie)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winner(id) => write!(f, "track {id} wins"),
            Self::Tie => f.write_str("tie"),
        }
    }
}

/// Result of a settled comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceOutcome {
    /// Scheduling mode the race ran under.
    pub mode: SchedulingMode,
    /// Baseline length.
    pub array_size: usize,
    /// Algorithm on track A.
    pub algorithm_a: Algorithm,
    /// Algorithm on track B.
    pub algorithm_b: Algorithm,
    /// Track A's elapsed time.
    pub elapsed_a: SimTime,
    /// Track B's elapsed time.
    pub elapsed_b: SimTime,
    /// Steps track A performed.
    pub steps_a: u64,
    /// Steps track B performed.
    pub steps_b: u64,
    /// Winner or tie.
    pub verdict: Verdict,
    /// Absolute difference of the elapsed times.
    pub margin: SimTime,
    /// Scheduler ticks from start to settle.
    pub ticks: u64,
}

impl RaceOutcome {
    /// Algorithm on `track`.
    #[must_use]
    pub const fn algorithm(&self, track: TrackId) -> Algorithm {
        match track {
            TrackId::A => self.algorithm_a,
            TrackId::B => self.algorithm_b,
        }
    }

    /// Elapsed time of `track`.
    #[must_use]
    pub const fn elapsed(&self, track: TrackId) -> SimTime {
        match track {
            TrackId::A => self.elapsed_a,
            TrackId::B => self.elapsed_b,
        }
    }

    /// Steps performed by `track`.
    #[must_use]
    pub const fn steps(&self, track: TrackId) -> u64 {
        match track {
            TrackId::A => self.steps_a,
            TrackId::B => self.steps_b,
        }
    }

    /// Winning algorithm; `None` on a tie.
    #[must_use]
    pub fn winner_algorithm(&self) -> Option<Algorithm> {
        self.verdict.winner().map(|id| self.algorithm(id))
    }
}
