//! Bubble sort.
//!
//! Pass `i` compares `a[j]` with `a[j+1]` for `j` in `0..N-1-i`. Only a swap
//! suspends; comparisons that leave the pair alone run straight through to
//! the next comparison within the same resume.

use super::{Cells, SortMachine, SortValue, StepOutcome};
use crate::error::RaceResult;

#[derive(Debug, Clone)]
pub(crate) struct BubbleSort {
    len: usize,
    pass: usize,
    j: usize,
}

impl BubbleSort {
    pub(crate) const fn new(len: usize) -> Self {
        Self { len, pass: 0, j: 0 }
    }
}

impl<T: SortValue> SortMachine<T> for BubbleSort {
    fn advance(&mut self, cells: &mut Cells<'_, T>) -> RaceResult<StepOutcome> {
        let passes = self.len.saturating_sub(1);
        while self.pass < passes {
            let bound = self.len - 1 - self.pass;
            if self.j >= bound {
                self.pass += 1;
                self.j = 0;
                continue;
            }

            let j = self.j;
            self.j += 1;
            if cells.get(j + 1)? < cells.get(j)? {
                cells.swap(j, j + 1)?;
                return Ok(StepOutcome::Continued);
            }
        }
        Ok(StepOutcome::Exhausted)
    }
}
