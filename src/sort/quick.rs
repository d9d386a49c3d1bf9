//! Quick sort (Lomuto partition, last element as pivot).
//!
//! Recursion is replaced by an explicit stack of pending half-open ranges.
//! After a partition the right range is pushed before the left one so the
//! left range is popped first, which reproduces the depth-first,
//! left-before-right order of the recursive formulation exactly.
//!
//! Steps: every swap triggered by `a[j] <= pivot` (including self-swaps when
//! the store pointer has not fallen behind `j`), plus the pivot placement swap
//! that closes each partition.

use super::{Cells, SortMachine, SortValue, StepOutcome};
use crate::error::RaceResult;

/// Partition in progress over `lo..hi`; the pivot sits at `hi - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Partition {
    lo: usize,
    hi: usize,
    /// Next slot for an element `<= pivot`.
    store: usize,
    /// Next element to compare against the pivot.
    j: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct QuickSort {
    pending: Vec<(usize, usize)>,
    active: Option<Partition>,
}

impl QuickSort {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            pending: vec![(0, len)],
            active: None,
        }
    }
}

impl<T: SortValue> SortMachine<T> for QuickSort {
    fn advance(&mut self, cells: &mut Cells<'_, T>) -> RaceResult<StepOutcome> {
        loop {
            if let Some(mut part) = self.active {
                let pivot_at = part.hi - 1;
                if part.j < pivot_at {
                    let j = part.j;
                    part.j += 1;
                    let swapped = cells.get(j)? <= cells.get(pivot_at)?;
                    if swapped {
                        cells.swap(part.store, j)?;
                        part.store += 1;
                    }
                    self.active = Some(part);
                    if swapped {
                        return Ok(StepOutcome::Continued);
                    }
                    continue;
                }

                cells.swap(part.store, pivot_at)?;
                self.active = None;
                self.pending.push((part.store + 1, part.hi));
                self.pending.push((part.lo, part.store));
                return Ok(StepOutcome::Continued);
            }

            let Some((lo, hi)) = self.pending.pop() else {
                return Ok(StepOutcome::Exhausted);
            };
            if hi.saturating_sub(lo) > 1 {
                self.active = Some(Partition {
                    lo,
                    hi,
                    store: lo,
                    j: lo,
                });
            }
        }
    }
}
