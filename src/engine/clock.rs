//! Tick clocks.
//!
//! The scheduler reads the clock exactly once per tick while a comparison is
//! running. Two sources are provided:
//! - [`SimClock`]: fixed timestep per tick, fully reproducible
//! - [`WallClock`]: monotonic real time since the last reset

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::SimTime;

/// Time source driven by scheduler ticks.
pub trait TickClock {
    /// Advance to the next tick and return its time.
    fn tick(&mut self) -> SimTime;

    /// Restart from zero; called when a comparison starts.
    fn reset(&mut self);
}

impl<C: TickClock + ?Sized> TickClock for Box<C> {
    fn tick(&mut self) -> SimTime {
        (**self).tick()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Deterministic race clock.
///
/// Every tick advances time by one fixed interval, so a track's elapsed time
/// is always a whole number of intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Current race time.
    current: SimTime,
    /// Tick interval in nanoseconds.
    interval_nanos: u64,
    /// Number of ticks taken.
    tick_count: u64,
}

impl SimClock {
    /// Create a clock with the given tick interval in nanoseconds.
    #[must_use]
    pub const fn from_nanos(interval_nanos: u64) -> Self {
        Self {
            current: SimTime::ZERO,
            interval_nanos,
            tick_count: 0,
        }
    }

    /// Create a clock with the given tick interval in milliseconds.
    #[must_use]
    pub const fn from_millis(interval_millis: u64) -> Self {
        Self::from_nanos(interval_millis.saturating_mul(1_000_000))
    }

    /// Get current race time.
    #[must_use]
    pub const fn current_time(&self) -> SimTime {
        self.current
    }

    /// Get the tick interval.
    #[must_use]
    pub const fn interval(&self) -> SimTime {
        SimTime::from_nanos(self.interval_nanos)
    }

    /// Get number of ticks taken.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl TickClock for SimClock {
    fn tick(&mut self) -> SimTime {
        self.current = self.current.add_nanos(self.interval_nanos);
        self.tick_count += 1;
        self.current
    }

    fn reset(&mut self) {
        self.current = SimTime::ZERO;
        self.tick_count = 0;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        // One tick per 100ms at speed 1
        Self::from_millis(100)
    }
}

/// Real-time clock for interactive playback.
///
/// Starts on the first tick after a reset; elapsed track times then reflect
/// how long the caller's cadence actually took.
#[derive(Debug, Clone, Default)]
pub struct WallClock {
    start: Option<Instant>,
}

impl WallClock {
    /// Create a stopped clock.
    #[must_use]
    pub const fn new() -> Self {
        Self { start: None }
    }

    /// Whether the clock has been started since the last reset.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.start.is_some()
    }
}

impl TickClock for WallClock {
    fn tick(&mut self) -> SimTime {
        let start = *self.start.get_or_insert_with(Instant::now);
        SimTime::from(start.elapsed())
    }

    fn reset(&mut self) {
        self.start = None;
    }
}
