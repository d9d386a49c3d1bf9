//! # sortrace
//!
//! Deterministic step engine and dual-track scheduler for racing sorting
//! algorithms.
//!
//! Each algorithm is a resumable state machine that performs exactly one
//! observable step per resume. Two of them race over private copies of one
//! baseline array, either one after the other (`Sequential`, a wall-clock
//! style timing race) or one step each per tick (`Lockstep`, a step-count
//! race). Time comes from an injected clock, so a race on the simulated
//! clock is bit-for-bit reproducible.
//!
//! ## Example
//!
//! ```rust
//! use sortrace::prelude::*;
//!
//! let baseline = new_baseline(64, 10, 600, 42)?;
//! let mut scheduler = DualTrackScheduler::new(SimClock::from_millis(100));
//! scheduler.start_comparison(&baseline, Algorithm::Merge, Algorithm::Bubble, SchedulingMode::Lockstep);
//!
//! let outcome = scheduler.run_to_completion(100_000)?;
//! assert_eq!(outcome.and_then(RaceOutcome::winner_algorithm), Some(Algorithm::Merge));
//! # Ok::<(), RaceError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod replay;
pub mod report;
pub mod sort;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{RaceConfig, RaceConfigBuilder};
    pub use crate::engine::jidoka::SortGuard;
    pub use crate::engine::rng::{new_baseline, SimRng};
    pub use crate::engine::{
        DualTrackScheduler, RaceOutcome, RaceState, SchedulingMode, SimClock, SimTime, TickClock,
        TrackId, Verdict, WallClock,
    };
    pub use crate::error::{RaceError, RaceResult};
    pub use crate::report::{RaceLedger, ResultSink};
    pub use crate::sort::{Algorithm, StepOutcome, StepProducer};
}

/// Re-export for public API
pub use error::{RaceError, RaceResult};
