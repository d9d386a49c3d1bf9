//! Resumable step engine.
//!
//! Each sorting algorithm is an explicit state machine that performs one
//! observable step per `resume` and then suspends. Whatever the recursive
//! formulation would keep on its call stack (loop indices, pending ranges,
//! merge buffers, the active sift) lives in the machine instead, so a
//! producer can be parked between ticks for as long as the caller likes.
//!
//! The array itself is owned by the caller (a [`Track`](crate::engine::track::Track))
//! and lent to the producer on every resume. All element access goes through
//! [`Cells`], which turns an out-of-range index into
//! [`RaceError::IndexInvariantViolation`] instead of a panic.

mod bubble;
mod heap;
mod insertion;
mod merge;
mod quick;
mod selection;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use crate::error::{RaceError, RaceResult};

use bubble::BubbleSort;
use heap::HeapSort;
use insertion::InsertionSort;
use merge::MergeSort;
use quick::QuickSort;
use selection::SelectionSort;

/// Values a step producer can sort.
pub trait SortValue: Ord + Copy + Debug + Send + 'static {}

impl<T: Ord + Copy + Debug + Send + 'static> SortValue for T {}

/// Result of a single resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepOutcome {
    /// One step was performed and more remain.
    Continued,
    /// No steps remain; the array is sorted.
    Exhausted,
}

/// A sorting algorithm reformulated as a suspendable step producer.
pub trait StepProducer<T: SortValue>: Debug + Send {
    /// Algorithm this producer runs.
    fn algorithm(&self) -> Algorithm;

    /// Perform the next step against `data`.
    ///
    /// # Errors
    ///
    /// - [`RaceError::AlreadyExhausted`] if called after `Exhausted` was returned.
    /// - [`RaceError::IndexInvariantViolation`] if `data` does not have the
    ///   length the producer was created for, or the machine strays out of
    ///   bounds.
    fn resume(&mut self, data: &mut [T]) -> RaceResult<StepOutcome>;

    /// Number of steps performed so far (resumes that returned `Continued`).
    fn steps(&self) -> u64;

    /// Whether `Exhausted` has been returned.
    fn is_exhausted(&self) -> bool;
}

/// The six supported algorithms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Adjacent-swap passes; only swaps are observable.
    Bubble,
    /// Minimum scan; every comparison is observable.
    Selection,
    /// Shift-and-place insertion.
    Insertion,
    /// Lomuto quicksort with last-element pivot.
    Quick,
    /// Top-down merge sort.
    #[default]
    Merge,
    /// Max-heap build then extraction.
    Heap,
}

impl Algorithm {
    /// All algorithms in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Quick,
        Self::Merge,
        Self::Heap,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Selection => "Selection Sort",
            Self::Insertion => "Insertion Sort",
            Self::Quick => "Quick Sort",
            Self::Merge => "Merge Sort",
            Self::Heap => "Heap Sort",
        }
    }

    /// Short identifier used in configuration files and on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Quick => "quick",
            Self::Merge => "merge",
            Self::Heap => "heap",
        }
    }

    /// One-sentence description of the algorithm.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Bubble => "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
            Self::Selection => "Divides the input into a sorted and unsorted region, and iteratively shrinks the unsorted region by extracting the smallest element.",
            Self::Insertion => "Builds the final sorted array one item at a time by comparing each item with the already sorted portion and inserting it at the correct position.",
            Self::Quick => "Uses a divide-and-conquer strategy, picking a pivot element and partitioning the array around it.",
            Self::Merge => "Divides the array into halves, recursively sorts them, and then merges the sorted halves.",
            Self::Heap => "Uses a binary heap data structure to sort elements, converting the array into a max heap and repeatedly extracting the maximum.",
        }
    }

    /// Worst/average time complexity.
    #[must_use]
    pub const fn time_complexity(self) -> &'static str {
        match self {
            Self::Bubble | Self::Selection | Self::Insertion => "O(n²)",
            Self::Quick => "O(n log n) average, O(n²) worst",
            Self::Merge | Self::Heap => "O(n log n)",
        }
    }

    /// Auxiliary space complexity.
    #[must_use]
    pub const fn space_complexity(self) -> &'static str {
        match self {
            Self::Bubble | Self::Selection | Self::Insertion | Self::Heap => "O(1)",
            Self::Quick => "O(log n)",
            Self::Merge => "O(n)",
        }
    }

    /// Create a fresh step producer for an array of `len` elements.
    #[must_use]
    pub fn producer<T: SortValue>(self, len: usize) -> Box<dyn StepProducer<T>> {
        match self {
            Self::Bubble => Box::new(Stepper::new(self, len, BubbleSort::new(len))),
            Self::Selection => Box::new(Stepper::new(self, len, SelectionSort::new(len))),
            Self::Insertion => Box::new(Stepper::new(self, len, InsertionSort::<T>::new(len))),
            Self::Quick => Box::new(Stepper::new(self, len, QuickSort::new(len))),
            Self::Merge => Box::new(Stepper::new(self, len, MergeSort::<T>::new(len))),
            Self::Heap => Box::new(Stepper::new(self, len, HeapSort::new(len))),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        let stem = normalized.strip_suffix("-sort").unwrap_or(&normalized);
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.slug() == stem)
            .ok_or_else(|| {
                RaceError::config(format!(
                    "unknown algorithm '{s}' (expected one of: bubble, selection, insertion, quick, merge, heap)"
                ))
            })
    }
}

/// Bounds-checked view of the array a producer is working on.
#[derive(Debug)]
pub struct Cells<'a, T> {
    algorithm: Algorithm,
    data: &'a mut [T],
}

impl<'a, T: SortValue> Cells<'a, T> {
    /// Wrap `data` for `algorithm`.
    pub fn new(algorithm: Algorithm, data: &'a mut [T]) -> Self {
        Self { algorithm, data }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn violation(&self, index: usize) -> RaceError {
        RaceError::IndexInvariantViolation {
            algorithm: self.algorithm,
            index,
            len: self.data.len(),
        }
    }

    /// Read the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexInvariantViolation` if `index` is out of range.
    pub fn get(&self, index: usize) -> RaceResult<T> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.violation(index))
    }

    /// Overwrite the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexInvariantViolation` if `index` is out of range.
    pub fn set(&mut self, index: usize, value: T) -> RaceResult<()> {
        let len = self.data.len();
        match self.data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RaceError::IndexInvariantViolation {
                algorithm: self.algorithm,
                index,
                len,
            }),
        }
    }

    /// Swap the elements at `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns `IndexInvariantViolation` if either index is out of range.
    pub fn swap(&mut self, a: usize, b: usize) -> RaceResult<()> {
        for index in [a, b] {
            if index >= self.data.len() {
                return Err(self.violation(index));
            }
        }
        self.data.swap(a, b);
        Ok(())
    }
}

/// One algorithm's private state machine.
///
/// `advance` runs until the next suspension point and reports whether a step
/// was taken or the machine has nothing left to do. The [`Stepper`] adapter
/// takes care of the exhaustion flag, step counting and length checks.
pub(crate) trait SortMachine<T: SortValue>: Debug + Send {
    fn advance(&mut self, cells: &mut Cells<'_, T>) -> RaceResult<StepOutcome>;
}

/// Generic [`StepProducer`] around a [`SortMachine`].
#[derive(Debug)]
pub(crate) struct Stepper<M> {
    algorithm: Algorithm,
    len: usize,
    steps: u64,
    exhausted: bool,
    machine: M,
}

impl<M> Stepper<M> {
    pub(crate) const fn new(algorithm: Algorithm, len: usize, machine: M) -> Self {
        Self {
            algorithm,
            len,
            steps: 0,
            exhausted: false,
            machine,
        }
    }
}

impl<T: SortValue, M: SortMachine<T>> StepProducer<T> for Stepper<M> {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn resume(&mut self, data: &mut [T]) -> RaceResult<StepOutcome> {
        if self.exhausted {
            return Err(RaceError::AlreadyExhausted {
                algorithm: self.algorithm,
            });
        }
        if data.len() != self.len {
            return Err(RaceError::IndexInvariantViolation {
                algorithm: self.algorithm,
                index: self.len,
                len: data.len(),
            });
        }

        let mut cells = Cells::new(self.algorithm, data);
        let outcome = self.machine.advance(&mut cells)?;
        match outcome {
            StepOutcome::Continued => self.steps += 1,
            StepOutcome::Exhausted => self.exhausted = true,
        }
        Ok(outcome)
    }

    fn steps(&self) -> u64 {
        self.steps
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Drive a fresh producer over `data` until exhaustion and return its step count.
///
/// # Errors
///
/// Propagates any producer fault.
pub fn run_to_exhaustion<T: SortValue>(algorithm: Algorithm, data: &mut [T]) -> RaceResult<u64> {
    let mut producer = algorithm.producer::<T>(data.len());
    while producer.resume(data)? == StepOutcome::Continued {}
    Ok(producer.steps())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names() {
        assert_eq!(Algorithm::Bubble.name(), "Bubble Sort");
        assert_eq!(Algorithm::Heap.to_string(), "Heap Sort");
        assert_eq!(Algorithm::ALL.len(), 6);
    }

    #[test]
    fn test_catalog_complexities() {
        assert_eq!(Algorithm::Merge.space_complexity(), "O(n)");
        assert_eq!(Algorithm::Quick.space_complexity(), "O(log n)");
        assert!(Algorithm::Quick.time_complexity().contains("worst"));
        for algorithm in Algorithm::ALL {
            assert!(!algorithm.description().is_empty());
        }
    }

    #[test]
    fn test_from_str_variants() {
        assert_eq!("bubble".parse::<Algorithm>().ok(), Some(Algorithm::Bubble));
        assert_eq!("Quick Sort".parse::<Algorithm>().ok(), Some(Algorithm::Quick));
        assert_eq!("merge-sort".parse::<Algorithm>().ok(), Some(Algorithm::Merge));
        assert_eq!("HEAP_SORT".parse::<Algorithm>().ok(), Some(Algorithm::Heap));
        assert!("bogo".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&Algorithm::Insertion).ok();
        assert_eq!(json.as_deref(), Some("\"insertion\""));
        let parsed: Option<Algorithm> = serde_yaml::from_str("selection").ok();
        assert_eq!(parsed, Some(Algorithm::Selection));
    }

    #[test]
    fn test_empty_and_singleton_exhaust_immediately() {
        for algorithm in Algorithm::ALL {
            for input in [vec![], vec![42_i64]] {
                let mut data = input.clone();
                let mut producer = algorithm.producer::<i64>(data.len());
                let outcome = producer.resume(&mut data);
                assert!(
                    matches!(outcome, Ok(StepOutcome::Exhausted)),
                    "{algorithm} on {input:?} did not exhaust on first resume"
                );
                assert_eq!(producer.steps(), 0);
                assert_eq!(data, input);
            }
        }
    }

    #[test]
    fn test_resume_after_exhaustion_is_error() {
        for algorithm in Algorithm::ALL {
            let mut data = vec![3_i64, 1, 2];
            let mut producer = algorithm.producer::<i64>(data.len());
            while let Ok(StepOutcome::Continued) = producer.resume(&mut data) {}
            assert!(producer.is_exhausted());
            let err = producer.resume(&mut data);
            assert!(matches!(err, Err(RaceError::AlreadyExhausted { .. })));
        }
    }

    #[test]
    fn test_length_mismatch_is_index_violation() {
        let mut producer = Algorithm::Bubble.producer::<i64>(5);
        let mut short = vec![2_i64, 1];
        let err = producer.resume(&mut short);
        assert!(matches!(
            err,
            Err(RaceError::IndexInvariantViolation { index: 5, len: 2, .. })
        ));
    }

    #[test]
    fn test_cells_bounds() {
        let mut data = vec![1_i64, 2, 3];
        let mut cells = Cells::new(Algorithm::Heap, &mut data);
        assert_eq!(cells.len(), 3);
        assert!(!cells.is_empty());
        assert!(cells.get(2).is_ok());
        assert!(cells.get(3).is_err());
        assert!(cells.set(3, 0).is_err());
        assert!(cells.swap(0, 3).is_err());
        assert!(cells.swap(0, 2).is_ok());
        assert_eq!(data, vec![3, 2, 1]);
    }

    #[test]
    fn test_run_to_exhaustion_sorts() {
        let mut data = vec![5_i64, 3, 8, 1];
        let steps = run_to_exhaustion(Algorithm::Bubble, &mut data);
        assert_eq!(steps.ok(), Some(4));
        assert_eq!(data, vec![1, 3, 5, 8]);
    }

    #[test]
    fn test_generic_over_value_type() {
        let words = vec!['d', 'a', 'c', 'b'];
        for algorithm in Algorithm::ALL {
            let mut data = words.clone();
            assert!(run_to_exhaustion(algorithm, &mut data).is_ok());
            assert_eq!(data, vec!['a', 'b', 'c', 'd']);
        }
    }
}
