//! Reproducibility verification.
//!
//! A race on the simulated clock is a pure function of its configuration.
//! `verify_reproducibility` runs the configured race several times and
//! fingerprints each run (bincode, then blake3) over the outcome and both
//! final arrays. Every fingerprint must match the first.

use serde::{Deserialize, Serialize};

use crate::config::RaceConfig;
use crate::engine::{DualTrackScheduler, RaceOutcome, SimClock, TrackId};
use crate::error::{RaceError, RaceResult};

/// Hash any serializable state with bincode + blake3.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn hash_state<S: Serialize>(state: &S) -> RaceResult<[u8; 32]> {
    let bytes = bincode::serialize(state)
        .map_err(|e| RaceError::serialization(format!("Hash state: {e}")))?;
    Ok(*blake3::hash(&bytes).as_bytes())
}

/// Everything a finished simulated race produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceRun {
    /// The settled result.
    pub outcome: RaceOutcome,
    /// Final arrays, by track.
    pub arrays: [Vec<i64>; 2],
}

impl RaceRun {
    /// Hex fingerprint of this run.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn fingerprint(&self) -> RaceResult<String> {
        let hash = hash_state(self)?;
        Ok(blake3::Hash::from(hash).to_hex().to_string())
    }
}

/// Run the configured race on the simulated clock.
///
/// The configured clock kind is ignored: wall time is never reproducible.
///
/// # Errors
///
/// Returns configuration errors, or the fault that aborted the run.
pub fn run_simulated(config: &RaceConfig) -> RaceResult<RaceRun> {
    let baseline = config.baseline()?;
    let mut scheduler = DualTrackScheduler::new(SimClock::from_nanos(config.tick_interval().as_nanos()))
        .with_tie_tolerance(config.tie_tolerance()?)
        .with_guard(config.sort_guard());

    scheduler.start_comparison(&baseline, config.race.left, config.race.right, config.race.mode);
    let outcome = scheduler
        .run_to_completion(u64::MAX)?
        .cloned()
        .ok_or_else(|| RaceError::config("race did not settle"))?;

    let array = |id| {
        scheduler
            .track(id)
            .map(|track| track.data().to_vec())
            .unwrap_or_default()
    };
    Ok(RaceRun {
        outcome,
        arrays: [array(TrackId::A), array(TrackId::B)],
    })
}

/// Summary of a reproducibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproducibilitySummary {
    /// Whether reproducibility check passed
    pub passed: bool,
    /// Number of runs performed
    pub runs: usize,
    /// Whether all runs produced identical results
    pub identical: bool,
    /// Fingerprint of the first run
    pub reference_hash: String,
    /// Fingerprints of all runs
    pub run_hashes: Vec<String>,
    /// Platform information
    pub platform: String,
    /// Outcome of the first run
    pub outcome: RaceOutcome,
}

/// Run the configured race `runs` times and compare fingerprints.
///
/// # Errors
///
/// Returns a configuration error if `runs` is zero, or any error from the
/// runs themselves.
pub fn verify_reproducibility(config: &RaceConfig, runs: usize) -> RaceResult<ReproducibilitySummary> {
    if runs == 0 {
        return Err(RaceError::config("reproducibility check needs at least one run"));
    }

    let reference = run_simulated(config)?;
    let reference_hash = reference.fingerprint()?;
    let mut run_hashes = vec![reference_hash.clone()];
    for _ in 1..runs {
        run_hashes.push(run_simulated(config)?.fingerprint()?);
    }

    let identical = run_hashes.iter().all(|hash| *hash == reference_hash);
    Ok(ReproducibilitySummary {
        passed: identical,
        runs,
        identical,
        reference_hash,
        run_hashes,
        platform: std::env::consts::ARCH.to_string(),
        outcome: reference.outcome,
    })
}
