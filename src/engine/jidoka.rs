//! Jidoka (自働化) - stop the line on a bad sort.
//!
//! When a track finishes, its array must be exactly the sorted baseline: in
//! non-decreasing order and a permutation of the original multiset. Comparing
//! against one pre-sorted copy of the baseline checks both at once. A
//! mismatch means the producer's state machine is defective, so the run is
//! aborted rather than timed.
//!
//! Elements are compared with `Ord`, so values that sort as equal may end up
//! in any relative order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{RaceError, RaceResult};
use crate::sort::{Algorithm, SortValue};

/// Finished-array check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortGuard {
    enabled: bool,
}

impl SortGuard {
    /// Create a guard.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Guard that accepts everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Whether checks are performed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check a finished array against the sorted baseline.
    ///
    /// # Errors
    ///
    /// Returns `SortInvariantViolation` at the first index where `data`
    /// differs from `expected` (a length difference counts as a mismatch at
    /// the shorter length).
    pub fn check<T: SortValue>(
        &self,
        algorithm: Algorithm,
        data: &[T],
        expected: &[T],
    ) -> RaceResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let mismatch = data
            .iter()
            .zip(expected)
            .position(|(actual, wanted)| actual.cmp(wanted) != Ordering::Equal)
            .or_else(|| (data.len() != expected.len()).then(|| data.len().min(expected.len())));

        match mismatch {
            Some(index) => Err(RaceError::SortInvariantViolation { algorithm, index }),
            None => Ok(()),
        }
    }
}

impl Default for SortGuard {
    fn default() -> Self {
        Self::new(true)
    }
}
