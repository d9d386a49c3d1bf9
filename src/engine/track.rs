//! Tracks: one step producer, its own array copy and its timing window.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::SimTime;
use crate::error::RaceResult;
use crate::sort::{Algorithm, SortValue, StepOutcome, StepProducer};

/// Which side of the race a track is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackId {
    /// Left track; always advanced first.
    A,
    /// Right track.
    B,
}

impl TrackId {
    /// Position in per-track arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// The other track.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Lifecycle of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackStatus {
    /// Created but not started.
    Idle,
    /// Started; the producer has steps left.
    Running,
    /// The producer reported exhaustion.
    Finished,
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Running => f.write_str("running"),
            Self::Finished => f.write_str("finished"),
        }
    }
}

/// What a single `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackEvent {
    /// The track was not running; nothing happened.
    Skipped,
    /// One step was performed.
    Stepped,
    /// The producer exhausted on this advance.
    Finished,
}

/// A step producer racing over its own copy of the baseline.
#[derive(Debug)]
pub struct Track<T: SortValue> {
    algorithm: Algorithm,
    data: Vec<T>,
    producer: Box<dyn StepProducer<T>>,
    status: TrackStatus,
    /// Time of the first advance; `None` until then.
    started_at: Option<SimTime>,
    /// Time of the advance that reported exhaustion.
    finished_at: Option<SimTime>,
}

impl<T: SortValue> Track<T> {
    /// Create an idle track over a private copy of `baseline`.
    #[must_use]
    pub fn new(algorithm: Algorithm, baseline: &[T]) -> Self {
        Self {
            algorithm,
            data: baseline.to_vec(),
            producer: algorithm.producer::<T>(baseline.len()),
            status: TrackStatus::Idle,
            started_at: None,
            finished_at: None,
        }
    }

    /// Move from Idle to Running. Returns `false` if the track was not idle.
    pub fn start(&mut self) -> bool {
        if self.status != TrackStatus::Idle {
            return false;
        }
        self.status = TrackStatus::Running;
        self.started_at = None;
        true
    }

    /// Resume the producer once at time `now`.
    ///
    /// Idle and finished tracks are skipped rather than rejected, so the
    /// scheduler may call this on mode boundaries without checking first.
    ///
    /// # Errors
    ///
    /// Propagates producer faults; the track keeps its status.
    pub fn advance(&mut self, now: SimTime) -> RaceResult<TrackEvent> {
        if self.status != TrackStatus::Running {
            return Ok(TrackEvent::Skipped);
        }

        let started_at = *self.started_at.get_or_insert(now);
        match self.producer.resume(&mut self.data)? {
            StepOutcome::Continued => Ok(TrackEvent::Stepped),
            StepOutcome::Exhausted => {
                self.status = TrackStatus::Finished;
                self.finished_at = Some(now.max(started_at));
                Ok(TrackEvent::Finished)
            }
        }
    }

    /// Algorithm on this track.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Current array contents.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[cfg(test)]
    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TrackStatus {
        self.status
    }

    /// Whether the producer has exhausted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == TrackStatus::Finished
    }

    /// Steps performed so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.producer.steps()
    }

    /// Time of the first advance.
    #[must_use]
    pub const fn started_at(&self) -> Option<SimTime> {
        self.started_at
    }

    /// Time of the finishing advance.
    #[must_use]
    pub const fn finished_at(&self) -> Option<SimTime> {
        self.finished_at
    }

    /// Elapsed time from first advance to exhaustion; `None` until finished.
    #[must_use]
    pub fn elapsed(&self) -> Option<SimTime> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
