//! Result sinks.
//!
//! The scheduler pushes finished races out through [`ResultSink`]; it never
//! stores them anywhere itself. A sink receives, in order, one
//! [`TrackRecord`] for track A, one for track B, then one
//! [`ComparisonRecord`]. Cancelled or aborted runs produce nothing.
//!
//! [`RaceLedger`] is the in-memory statistics sink used by the CLI.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::engine::{SimTime, Verdict};
use crate::error::{RaceError, RaceResult};
use crate::sort::{Algorithm, SortValue};

/// One finished track.
#[derive(Debug, Clone, Copy)]
pub struct TrackRecord<'a, T> {
    /// Algorithm on the track.
    pub algorithm: Algorithm,
    /// First advance to exhaustion.
    pub elapsed: SimTime,
    /// Baseline length.
    pub array_size: usize,
    /// Final array contents.
    pub snapshot: &'a [T],
}

/// One settled comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// Algorithm on track A.
    pub algorithm_a: Algorithm,
    /// Algorithm on track B.
    pub algorithm_b: Algorithm,
    /// Winning algorithm; `None` on a tie.
    pub winner: Option<Algorithm>,
    /// Winner or tie by track.
    pub verdict: Verdict,
    /// Absolute difference of the elapsed times.
    pub margin: SimTime,
}

/// Receiver for finished races.
pub trait ResultSink<T: SortValue> {
    /// A track finished as part of a settled race.
    fn record_track(&mut self, record: &TrackRecord<'_, T>);

    /// A race settled.
    fn record_comparison(&mut self, record: &ComparisonRecord);
}

impl<T: SortValue, S: ResultSink<T>> ResultSink<T> for Rc<RefCell<S>> {
    fn record_track(&mut self, record: &TrackRecord<'_, T>) {
        self.borrow_mut().record_track(record);
    }

    fn record_comparison(&mut self, record: &ComparisonRecord) {
        self.borrow_mut().record_comparison(record);
    }
}

/// Per-algorithm timing statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmStats {
    /// Finished tracks.
    pub runs: u64,
    /// Sum of elapsed nanoseconds.
    pub total_nanos: u128,
    /// Fastest run.
    pub best: Option<SimTime>,
    /// Slowest run.
    pub worst: Option<SimTime>,
    /// Comparisons won.
    pub wins: u64,
}

impl AlgorithmStats {
    fn record(&mut self, elapsed: SimTime) {
        self.runs += 1;
        self.total_nanos += u128::from(elapsed.as_nanos());
        self.best = Some(self.best.map_or(elapsed, |best| best.min(elapsed)));
        self.worst = Some(self.worst.map_or(elapsed, |worst| worst.max(elapsed)));
    }

    /// Mean elapsed time; `None` before the first run.
    #[must_use]
    pub fn average(&self) -> Option<SimTime> {
        if self.runs == 0 {
            return None;
        }
        let mean = self.total_nanos / u128::from(self.runs);
        Some(SimTime::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX)))
    }
}

/// In-memory statistics over every settled race it has seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceLedger {
    algorithms: BTreeMap<Algorithm, AlgorithmStats>,
    comparisons: u64,
    ties: u64,
}

impl RaceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for one algorithm.
    #[must_use]
    pub fn stats(&self, algorithm: Algorithm) -> Option<&AlgorithmStats> {
        self.algorithms.get(&algorithm)
    }

    /// All algorithms seen so far, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &AlgorithmStats)> + '_ {
        self.algorithms.iter().map(|(algorithm, stats)| (*algorithm, stats))
    }

    /// Settled comparisons recorded.
    #[must_use]
    pub const fn comparisons(&self) -> u64 {
        self.comparisons
    }

    /// Comparisons that ended in a tie.
    #[must_use]
    pub const fn ties(&self) -> u64 {
        self.ties
    }

    /// Export the ledger as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn export_json(&self) -> RaceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RaceError::serialization(format!("Ledger JSON export: {e}")))
    }
}

impl<T: SortValue> ResultSink<T> for RaceLedger {
    fn record_track(&mut self, record: &TrackRecord<'_, T>) {
        self.algorithms
            .entry(record.algorithm)
            .or_default()
            .record(record.elapsed);
    }

    fn record_comparison(&mut self, record: &ComparisonRecord) {
        self.comparisons += 1;
        match record.winner {
            Some(winner) => self.algorithms.entry(winner).or_default().wins += 1,
            None => self.ties += 1,
        }
    }
}
