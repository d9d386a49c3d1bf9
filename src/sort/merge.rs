//! Merge sort.
//!
//! Top-down: split at `m = (l + r) / 2`, fully sort the left half, then the
//! right half, then merge. The call stack becomes a stack of [`Frame`]s; a
//! split pushes its merge first and its left half last so the left half runs
//! first. Every element written during a merge is one step, whether it came
//! from the head comparison or from draining a leftover run.

use super::{Cells, SortMachine, SortValue, StepOutcome};
use crate::error::RaceResult;

/// Pending work over the inclusive range `lo..=hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Split { lo: usize, hi: usize },
    Merge { lo: usize, mid: usize, hi: usize },
}

/// A merge in progress: copies of both runs and the write cursor.
#[derive(Debug, Clone)]
struct Merging<T> {
    left: Vec<T>,
    right: Vec<T>,
    i: usize,
    j: usize,
    k: usize,
}

impl<T: SortValue> Merging<T> {
    /// Next value to write, preferring the left run on ties.
    fn next_value(&mut self) -> Option<T> {
        match (self.left.get(self.i).copied(), self.right.get(self.j).copied()) {
            (Some(l), Some(r)) if l <= r => {
                self.i += 1;
                Some(l)
            }
            (Some(_), Some(r)) | (None, Some(r)) => {
                self.j += 1;
                Some(r)
            }
            (Some(l), None) => {
                self.i += 1;
                Some(l)
            }
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MergeSort<T> {
    frames: Vec<Frame>,
    merging: Option<Merging<T>>,
}

impl<T> MergeSort<T> {
    pub(crate) fn new(len: usize) -> Self {
        let frames = if len > 0 {
            vec![Frame::Split { lo: 0, hi: len - 1 }]
        } else {
            Vec::new()
        };
        Self {
            frames,
            merging: None,
        }
    }
}

fn copy_run<T: SortValue>(cells: &Cells<'_, T>, lo: usize, hi: usize) -> RaceResult<Vec<T>> {
    (lo..=hi).map(|index| cells.get(index)).collect()
}

impl<T: SortValue> SortMachine<T> for MergeSort<T> {
    fn advance(&mut self, cells: &mut Cells<'_, T>) -> RaceResult<StepOutcome> {
        loop {
            if let Some(merging) = self.merging.as_mut() {
                if let Some(value) = merging.next_value() {
                    cells.set(merging.k, value)?;
                    merging.k += 1;
                    return Ok(StepOutcome::Continued);
                }
                self.merging = None;
            }

            match self.frames.pop() {
                None => return Ok(StepOutcome::Exhausted),
                Some(Frame::Split { lo, hi }) => {
                    if lo < hi {
                        let mid = lo + (hi - lo) / 2;
                        self.frames.push(Frame::Merge { lo, mid, hi });
                        self.frames.push(Frame::Split { lo: mid + 1, hi });
                        self.frames.push(Frame::Split { lo, hi: mid });
                    }
                }
                Some(Frame::Merge { lo, mid, hi }) => {
                    self.merging = Some(Merging {
                        left: copy_run(cells, lo, mid)?,
                        right: copy_run(cells, mid + 1, hi)?,
                        i: 0,
                        j: 0,
                        k: lo,
                    });
                }
            }
        }
    }
}
