//! Heap sort.
//!
//! Build phase sifts down every internal node from `N/2 - 1` to 0, then the
//! extraction phase swaps the root behind the shrinking heap and sifts the
//! new root down. A sift swap is a step; the sift then resumes from the child
//! it swapped into, so a recursive heapify becomes one [`Sift`] cursor.
//! Every extraction swap is a step, even between equal elements.

use super::{Cells, SortMachine, SortValue, StepOutcome};
use crate::error::RaceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Internal nodes still to heapify, counted down from `N/2`.
    Build { remaining: usize },
    /// Next slot to receive the current maximum.
    Extract { end: usize },
}

/// Sift-down cursor inside a heap of `size` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sift {
    size: usize,
    node: usize,
}

impl Sift {
    /// Swaps `node` with its larger child if that child beats it. Returns the
    /// cursor for the child's subtree, or `None` once the heap property holds.
    fn step<T: SortValue>(self, cells: &mut Cells<'_, T>) -> RaceResult<Option<Self>> {
        let mut largest = self.node;
        for child in [2 * self.node + 1, 2 * self.node + 2] {
            if child < self.size && cells.get(child)? > cells.get(largest)? {
                largest = child;
            }
        }
        if largest == self.node {
            return Ok(None);
        }
        cells.swap(self.node, largest)?;
        Ok(Some(Self {
            size: self.size,
            node: largest,
        }))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HeapSort {
    len: usize,
    phase: Phase,
    sift: Option<Sift>,
}

impl HeapSort {
    pub(crate) const fn new(len: usize) -> Self {
        Self {
            len,
            phase: Phase::Build { remaining: len / 2 },
            sift: None,
        }
    }
}

impl<T: SortValue> SortMachine<T> for HeapSort {
    fn advance(&mut self, cells: &mut Cells<'_, T>) -> RaceResult<StepOutcome> {
        loop {
            if let Some(sift) = self.sift {
                self.sift = sift.step(cells)?;
                if self.sift.is_some() {
                    return Ok(StepOutcome::Continued);
                }
                continue;
            }

            match self.phase {
                Phase::Build { remaining: 0 } => {
                    self.phase = Phase::Extract {
                        end: self.len.saturating_sub(1),
                    };
                }
                Phase::Build { remaining } => {
                    self.phase = Phase::Build {
                        remaining: remaining - 1,
                    };
                    self.sift = Some(Sift {
                        size: self.len,
                        node: remaining - 1,
                    });
                }
                Phase::Extract { end: 0 } => return Ok(StepOutcome::Exhausted),
                Phase::Extract { end } => {
                    cells.swap(0, end)?;
                    self.phase = Phase::Extract { end: end - 1 };
                    self.sift = Some(Sift { size: end, node: 0 });
                    return Ok(StepOutcome::Continued);
                }
            }
        }
    }
}
