//! Deterministic baseline generation.
//!
//! Implements PCG (Permuted Congruential Generator) seeded from a single
//! master seed.
//!
//! # Reproducibility Guarantee
//!
//! Given the same master seed, size and range, the generated baseline is
//! bitwise-identical across runs and platforms.

use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::{RaceError, RaceResult};

/// Default baseline length.
pub const DEFAULT_SIZE: usize = 150;
/// Default smallest baseline value.
pub const DEFAULT_MIN: i64 = 10;
/// Default largest baseline value.
pub const DEFAULT_MAX: i64 = 600;

/// Deterministic, reproducible random number generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    /// Master seed for reproducibility.
    master_seed: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl SimRng {
    /// Create a new RNG with the given master seed.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            rng: Pcg64::seed_from_u64(master_seed),
        }
    }

    /// Get the master seed.
    #[must_use]
    pub const fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Generate a random u64.
    pub fn gen_u64(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Generate a random i64 uniformly in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `min > max`.
    pub fn gen_range_i64(&mut self, min: i64, max: i64) -> RaceResult<i64> {
        check_range(min, max)?;
        Ok(self.rng.gen_range(min..=max))
    }

    /// Generate a baseline of `size` values uniformly in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `min > max`.
    pub fn baseline(&mut self, size: usize, min: i64, max: i64) -> RaceResult<Vec<i64>> {
        check_range(min, max)?;
        Ok((0..size).map(|_| self.rng.gen_range(min..=max)).collect())
    }
}

fn check_range(min: i64, max: i64) -> RaceResult<()> {
    if min > max {
        return Err(RaceError::config(format!(
            "invalid value range: min {min} > max {max}"
        )));
    }
    Ok(())
}

/// Generate a fresh baseline from `seed`.
///
/// Pure: identical arguments always give identical arrays.
///
/// # Errors
///
/// Returns a configuration error if `min > max`.
///
/// # Example
///
/// ```rust
/// use sortrace::engine::rng::new_baseline;
///
/// let baseline = new_baseline(150, 10, 600, 42)?;
/// assert_eq!(baseline.len(), 150);
/// assert!(baseline.iter().all(|v| (10..=600).contains(v)));
/// # Ok::<(), sortrace::error::RaceError>(())
/// ```
pub fn new_baseline(size: usize, min: i64, max: i64, seed: u64) -> RaceResult<Vec<i64>> {
    SimRng::new(seed).baseline(size, min, max)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: every value lies inside the inclusive range.
        #[test]
        fn prop_baseline_in_range(
            seed in any::<u64>(),
            size in 0usize..256,
            min in -1000i64..1000,
            span in 0i64..1000,
        ) {
            let max = min + span;
            let baseline = new_baseline(size, min, max, seed);
            prop_assert!(baseline.is_ok());
            let baseline = baseline.unwrap_or_default();
            prop_assert_eq!(baseline.len(), size);
            prop_assert!(baseline.iter().all(|v| (min..=max).contains(v)));
        }

        /// Falsification: same seed gives the same baseline.
        #[test]
        fn prop_baseline_reproducible(seed in any::<u64>(), size in 0usize..128) {
            let a = new_baseline(size, 10, 600, seed).ok();
            let b = new_baseline(size, 10, 600, seed).ok();
            prop_assert_eq!(a, b);
        }
    }
}
