//! Error types for sortrace.
//!
//! Every fallible operation returns `Result<T, RaceError>` instead of
//! panicking. Engine faults are local to a single comparison run: they abort
//! that run and never touch the baseline or the other track.

use thiserror::Error;

use crate::engine::scheduler::RaceState;
use crate::sort::Algorithm;

/// Result type alias for sortrace operations.
pub type RaceResult<T> = Result<T, RaceError>;

/// Unified error type for all sortrace operations.
#[derive(Debug, Error)]
pub enum RaceError {
    // ===== Engine Faults =====
    /// A step producer touched an index outside the array.
    ///
    /// Indicates a bug in the algorithm's state machine. Fatal to the run.
    #[error("index invariant violated in {algorithm}: index {index} out of range for length {len}")]
    IndexInvariantViolation {
        /// Algorithm whose producer faulted.
        algorithm: Algorithm,
        /// Offending index.
        index: usize,
        /// Length of the array at the time of access.
        len: usize,
    },

    /// A step producer was resumed after it reported exhaustion.
    #[error("{algorithm} step producer resumed after exhaustion")]
    AlreadyExhausted {
        /// Algorithm whose producer was resumed.
        algorithm: Algorithm,
    },

    /// The scheduler was asked to do something its current state forbids.
    ///
    /// Never fatal: the scheduler logs it and treats the request as a no-op.
    #[error("invalid transition: cannot {action} while scheduler is {state}")]
    InvalidModeTransition {
        /// State the scheduler was in.
        state: RaceState,
        /// The rejected request.
        action: &'static str,
    },

    /// Jidoka: a finished track's array is not the sorted baseline.
    #[error("Jidoka: {algorithm} finished with an array that is not a sorted permutation of the baseline (first mismatch at index {index})")]
    SortInvariantViolation {
        /// Algorithm whose output was rejected.
        algorithm: Algorithm,
        /// First index that differs from the sorted baseline.
        index: usize,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RaceError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Check if this error must abort the current comparison run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::IndexInvariantViolation { .. }
                | Self::AlreadyExhausted { .. }
                | Self::SortInvariantViolation { .. }
        )
    }
}
