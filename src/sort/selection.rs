//! Selection sort.
//!
//! Every comparison against the running minimum is a step, whether or not it
//! moves the minimum. The closing swap of an outer iteration is a step only
//! when the minimum actually moved.

use super::{Cells, SortMachine, SortValue, StepOutcome};
use crate::error::RaceResult;

#[derive(Debug, Clone)]
pub(crate) struct SelectionSort {
    len: usize,
    i: usize,
    j: usize,
    min: usize,
}

impl SelectionSort {
    pub(crate) const fn new(len: usize) -> Self {
        Self {
            len,
            i: 0,
            j: 1,
            min: 0,
        }
    }
}

impl<T: SortValue> SortMachine<T> for SelectionSort {
    fn advance(&mut self, cells: &mut Cells<'_, T>) -> RaceResult<StepOutcome> {
        loop {
            if self.i >= self.len {
                return Ok(StepOutcome::Exhausted);
            }

            if self.j < self.len {
                if cells.get(self.j)? < cells.get(self.min)? {
                    self.min = self.j;
                }
                self.j += 1;
                return Ok(StepOutcome::Continued);
            }

            let (i, min) = (self.i, self.min);
            self.i += 1;
            self.j = self.i + 1;
            self.min = self.i;
            if min != i {
                cells.swap(i, min)?;
                return Ok(StepOutcome::Continued);
            }
        }
    }
}
