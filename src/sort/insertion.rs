//! Insertion sort.
//!
//! Each rightward shift of a larger element is a step, and so is the final
//! placement of the key, even when the key lands where it started.

use super::{Cells, SortMachine, SortValue, StepOutcome};
use crate::error::RaceResult;

#[derive(Debug, Clone, Copy)]
enum Phase<T> {
    /// Pick up `a[i]` as the next key.
    NextKey,
    /// Moving larger elements right; `hole` is where the key would go now.
    Shifting { key: T, hole: usize },
}

#[derive(Debug, Clone)]
pub(crate) struct InsertionSort<T> {
    len: usize,
    i: usize,
    phase: Phase<T>,
}

impl<T> InsertionSort<T> {
    pub(crate) const fn new(len: usize) -> Self {
        Self {
            len,
            i: 1,
            phase: Phase::NextKey,
        }
    }
}

impl<T: SortValue> SortMachine<T> for InsertionSort<T> {
    fn advance(&mut self, cells: &mut Cells<'_, T>) -> RaceResult<StepOutcome> {
        loop {
            match self.phase {
                Phase::NextKey => {
                    if self.i >= self.len {
                        return Ok(StepOutcome::Exhausted);
                    }
                    let key = cells.get(self.i)?;
                    self.phase = Phase::Shifting { key, hole: self.i };
                }
                Phase::Shifting { key, hole } => {
                    if hole > 0 {
                        let prev = cells.get(hole - 1)?;
                        if prev > key {
                            cells.set(hole, prev)?;
                            self.phase = Phase::Shifting {
                                key,
                                hole: hole - 1,
                            };
                            return Ok(StepOutcome::Continued);
                        }
                    }
                    cells.set(hole, key)?;
                    self.i += 1;
                    self.phase = Phase::NextKey;
                    return Ok(StepOutcome::Continued);
                }
            }
        }
    }
}
