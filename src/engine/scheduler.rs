//! Dual-track scheduler.
//!
//! State machine `Idle -> Comparing -> Settled`, driven by the caller's
//! cadence through [`DualTrackScheduler::tick`]. Guarantees:
//! - One clock reading per tick; every advance within a tick shares it
//! - Track A always advances before track B
//! - In sequential mode B starts on the tick after A finished
//! - A result exists only once both tracks finished, and is reported once
//!   to every sink

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::clock::{SimClock, TickClock};
use crate::engine::jidoka::SortGuard;
use crate::engine::outcome::{RaceOutcome, Verdict};
use crate::engine::track::{Track, TrackEvent, TrackId, TrackStatus};
use crate::engine::SimTime;
use crate::error::{RaceError, RaceResult};
use crate::report::{ComparisonRecord, ResultSink, TrackRecord};
use crate::sort::{Algorithm, SortValue};

/// How the two tracks share ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingMode {
    /// A runs to exhaustion, then B; each gets a clean timing window.
    #[default]
    Sequential,
    /// Both advance once per tick; compares step counts, not speed.
    Lockstep,
}

impl fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Lockstep => f.write_str("lockstep"),
        }
    }
}

impl FromStr for SchedulingMode {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(Self::Sequential),
            "lockstep" | "lock" => Ok(Self::Lockstep),
            other => Err(RaceError::config(format!(
                "unknown scheduling mode '{other}' (expected sequential or lockstep)"
            ))),
        }
    }
}

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceState {
    /// No active comparison.
    Idle,
    /// At least one track still running.
    Comparing,
    /// Both tracks finished; the result is available.
    Settled,
}

impl fmt::Display for RaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Comparing => f.write_str("comparing"),
            Self::Settled => f.write_str("settled"),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Ticks taken in the current comparison.
    pub tick: u64,
    /// Clock time of the latest tick.
    pub time: SimTime,
    /// Scheduler state after the tick.
    pub state: RaceState,
    /// Per-track events, indexed by [`TrackId::index`].
    pub events: [TrackEvent; 2],
}

impl TickReport {
    /// Event for one track.
    #[must_use]
    pub const fn event(&self, track: TrackId) -> TrackEvent {
        self.events[track.index()]
    }

    /// Whether any array may have changed, i.e. a step was taken.
    #[must_use]
    pub fn redraw_needed(&self) -> bool {
        self.events.iter().any(|event| *event != TrackEvent::Skipped)
    }
}

/// Borrowed view of a comparison for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RaceSnapshot<'a, T> {
    /// Scheduling mode.
    pub mode: SchedulingMode,
    /// Scheduler state.
    pub state: RaceState,
    /// Algorithms, by track.
    pub algorithms: [Algorithm; 2],
    /// Current arrays, by track.
    pub arrays: [&'a [T]; 2],
    /// Statuses, by track.
    pub statuses: [TrackStatus; 2],
    /// Steps performed, by track.
    pub steps: [u64; 2],
}

impl<'a, T> RaceSnapshot<'a, T> {
    /// Array of one track.
    #[must_use]
    pub const fn array(&self, track: TrackId) -> &'a [T] {
        self.arrays[track.index()]
    }

    /// Status of one track.
    #[must_use]
    pub const fn status(&self, track: TrackId) -> TrackStatus {
        self.statuses[track.index()]
    }
}

/// One comparison in flight (or settled).
#[derive(Debug)]
struct Comparison<T: SortValue> {
    mode: SchedulingMode,
    tracks: [Track<T>; 2],
    /// Sorted copy of the baseline for the guard.
    expected: Vec<T>,
}

/// Runs two step producers over copies of one baseline and decides a winner.
///
/// # Example
///
/// ```rust
/// use sortrace::engine::{DualTrackScheduler, SchedulingMode, SimClock, Verdict, TrackId};
/// use sortrace::sort::Algorithm;
///
/// let mut scheduler = DualTrackScheduler::new(SimClock::from_millis(100));
/// scheduler.start_comparison(&[5, 3, 8, 1], Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Sequential);
///
/// let outcome = scheduler.run_to_completion(1_000)?.cloned();
/// assert_eq!(outcome.map(|o| o.verdict), Some(Verdict::Winner(TrackId::A)));
/// # Ok::<(), sortrace::error::RaceError>(())
/// ```
pub struct DualTrackScheduler<T: SortValue = i64, C: TickClock = SimClock> {
    clock: C,
    tie_tolerance: SimTime,
    guard: SortGuard,
    state: RaceState,
    run: Option<Comparison<T>>,
    outcome: Option<RaceOutcome>,
    sinks: Vec<Box<dyn ResultSink<T>>>,
    ticks: u64,
    last_time: SimTime,
}

impl<T: SortValue> Default for DualTrackScheduler<T, SimClock> {
    fn default() -> Self {
        Self::new(SimClock::default())
    }
}

impl<T: SortValue, C: TickClock> fmt::Debug for DualTrackScheduler<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualTrackScheduler")
            .field("state", &self.state)
            .field("tie_tolerance", &self.tie_tolerance)
            .field("guard", &self.guard)
            .field("ticks", &self.ticks)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl<T: SortValue, C: TickClock> DualTrackScheduler<T, C> {
    /// Create an idle scheduler reading time from `clock`.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            tie_tolerance: SimTime::ZERO,
            guard: SortGuard::default(),
            state: RaceState::Idle,
            run: None,
            outcome: None,
            sinks: Vec::new(),
            ticks: 0,
            last_time: SimTime::ZERO,
        }
    }

    /// Window within which lockstep results count as a tie.
    #[must_use]
    pub fn with_tie_tolerance(mut self, tolerance: SimTime) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    /// Replace the finished-array guard.
    #[must_use]
    pub fn with_guard(mut self, guard: SortGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Register a sink for settled races.
    pub fn add_sink(&mut self, sink: Box<dyn ResultSink<T>>) {
        self.sinks.push(sink);
    }

    /// Start a new comparison, discarding any previous one.
    ///
    /// Both tracks get their own copy of `baseline`. Track A starts at once;
    /// track B too in lockstep mode.
    pub fn start_comparison(
        &mut self,
        baseline: &[T],
        algorithm_a: Algorithm,
        algorithm_b: Algorithm,
        mode: SchedulingMode,
    ) {
        if self.state == RaceState::Comparing {
            info!("Discarding unfinished comparison after {} ticks", self.ticks);
        }

        let mut tracks = [
            Track::new(algorithm_a, baseline),
            Track::new(algorithm_b, baseline),
        ];
        tracks[0].start();
        if mode == SchedulingMode::Lockstep {
            tracks[1].start();
        }

        let mut expected = baseline.to_vec();
        expected.sort_unstable();

        self.clock.reset();
        self.ticks = 0;
        self.last_time = SimTime::ZERO;
        self.outcome = None;
        self.run = Some(Comparison {
            mode,
            tracks,
            expected,
        });
        self.state = RaceState::Comparing;

        info!(
            "Comparison started: {algorithm_a} vs {algorithm_b} ({mode}, {} elements)",
            baseline.len()
        );
    }

    /// Advance the comparison by one tick.
    ///
    /// Ticking an idle scheduler is rejected as an invalid transition, logged
    /// and ignored. Ticking a settled scheduler changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the fault that aborted the run (`IndexInvariantViolation`,
    /// `AlreadyExhausted` or `SortInvariantViolation`). The scheduler is Idle
    /// afterwards and no result is emitted.
    pub fn tick(&mut self) -> RaceResult<TickReport> {
        match self.state {
            RaceState::Idle => {
                let rejected = RaceError::InvalidModeTransition {
                    state: self.state,
                    action: "tick",
                };
                debug!("Ignoring request: {rejected}");
                return Ok(self.report([TrackEvent::Skipped; 2]));
            }
            RaceState::Settled => return Ok(self.report([TrackEvent::Skipped; 2])),
            RaceState::Comparing => {}
        }

        let now = self.clock.tick();
        self.ticks += 1;
        self.last_time = now;

        match self.advance(now) {
            Ok(events) => {
                if self.both_finished() {
                    self.settle();
                }
                Ok(self.report(events))
            }
            Err(err) => {
                error!("Comparison aborted at tick {}: {err}", self.ticks);
                self.discard();
                Err(err)
            }
        }
    }

    fn advance(&mut self, now: SimTime) -> RaceResult<[TrackEvent; 2]> {
        let Some(run) = self.run.as_mut() else {
            return Ok([TrackEvent::Skipped; 2]);
        };

        let mut events = [TrackEvent::Skipped; 2];
        let [a, b] = &mut run.tracks;
        match run.mode {
            SchedulingMode::Sequential => {
                if a.is_finished() {
                    b.start();
                    events[1] = b.advance(now)?;
                } else {
                    events[0] = a.advance(now)?;
                }
            }
            SchedulingMode::Lockstep => {
                events[0] = a.advance(now)?;
                events[1] = b.advance(now)?;
            }
        }

        for (track, event) in run.tracks.iter().zip(events) {
            if event == TrackEvent::Finished {
                self.guard
                    .check(track.algorithm(), track.data(), &run.expected)?;
                debug!(
                    "{} finished: {} steps in {}",
                    track.algorithm(),
                    track.steps(),
                    track.elapsed().unwrap_or_default()
                );
            }
        }
        Ok(events)
    }

    fn both_finished(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| run.tracks.iter().all(Track::is_finished))
    }

    fn settle(&mut self) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        let [a, b] = &run.tracks;
        let elapsed_a = a.elapsed().unwrap_or_default();
        let elapsed_b = b.elapsed().unwrap_or_default();
        let verdict = Verdict::resolve(run.mode, elapsed_a, elapsed_b, self.tie_tolerance);

        let outcome = RaceOutcome {
            mode: run.mode,
            array_size: run.expected.len(),
            algorithm_a: a.algorithm(),
            algorithm_b: b.algorithm(),
            elapsed_a,
            elapsed_b,
            steps_a: a.steps(),
            steps_b: b.steps(),
            verdict,
            margin: elapsed_a.abs_diff(elapsed_b),
            ticks: self.ticks,
        };

        let comparison = ComparisonRecord {
            algorithm_a: outcome.algorithm_a,
            algorithm_b: outcome.algorithm_b,
            winner: outcome.winner_algorithm(),
            verdict,
            margin: outcome.margin,
        };
        for sink in &mut self.sinks {
            for track in [a, b] {
                sink.record_track(&TrackRecord {
                    algorithm: track.algorithm(),
                    elapsed: track.elapsed().unwrap_or_default(),
                    array_size: track.data().len(),
                    snapshot: track.data(),
                });
            }
            sink.record_comparison(&comparison);
        }

        info!(
            "Comparison settled after {} ticks: {} {} vs {} {}, {verdict} by {}",
            outcome.ticks,
            outcome.algorithm_a,
            outcome.elapsed_a,
            outcome.algorithm_b,
            outcome.elapsed_b,
            outcome.margin
        );
        self.outcome = Some(outcome);
        self.state = RaceState::Settled;
    }

    fn discard(&mut self) {
        self.run = None;
        self.outcome = None;
        self.state = RaceState::Idle;
    }

    fn report(&self, events: [TrackEvent; 2]) -> TickReport {
        TickReport {
            tick: self.ticks,
            time: self.last_time,
            state: self.state,
            events,
        }
    }

    /// Abandon the current comparison from any state. No result is emitted.
    pub fn cancel(&mut self) {
        if self.state != RaceState::Idle {
            info!("Comparison cancelled in state {}", self.state);
        }
        self.discard();
    }

    /// Tick until settled or `max_ticks` ticks have been taken in total.
    ///
    /// Returns `None` if the budget ran out first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModeTransition` if no comparison was started, or the
    /// fault that aborted the run.
    pub fn run_to_completion(&mut self, max_ticks: u64) -> RaceResult<Option<&RaceOutcome>> {
        if self.state == RaceState::Idle {
            return Err(RaceError::InvalidModeTransition {
                state: self.state,
                action: "run to completion",
            });
        }
        while self.state == RaceState::Comparing && self.ticks < max_ticks {
            self.tick()?;
        }
        Ok(self.result())
    }

    /// Both arrays and statuses; `None` while Idle.
    #[must_use]
    pub fn snapshot(&self) -> Option<RaceSnapshot<'_, T>> {
        let run = self.run.as_ref()?;
        let [a, b] = &run.tracks;
        Some(RaceSnapshot {
            mode: run.mode,
            state: self.state,
            algorithms: [a.algorithm(), b.algorithm()],
            arrays: [a.data(), b.data()],
            statuses: [a.status(), b.status()],
            steps: [a.steps(), b.steps()],
        })
    }

    /// The result; only available once Settled.
    #[must_use]
    pub fn result(&self) -> Option<&RaceOutcome> {
        match self.state {
            RaceState::Settled => self.outcome.as_ref(),
            RaceState::Idle | RaceState::Comparing => None,
        }
    }

    /// One track of the current comparison.
    #[must_use]
    pub fn track(&self, id: TrackId) -> Option<&Track<T>> {
        self.run.as_ref().map(|run| &run.tracks[id.index()])
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RaceState {
        self.state
    }

    /// Mode of the current comparison.
    #[must_use]
    pub fn mode(&self) -> Option<SchedulingMode> {
        self.run.as_ref().map(|run| run.mode)
    }

    /// Ticks taken in the current comparison.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Lockstep tie window.
    #[must_use]
    pub const fn tie_tolerance(&self) -> SimTime {
        self.tie_tolerance
    }

    /// The clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const BASELINE: [i64; 4] = [5, 3, 8, 1];

    fn ms(millis: u64) -> SimTime {
        SimTime::from_millis(millis)
    }

    fn scheduler() -> DualTrackScheduler {
        DualTrackScheduler::new(SimClock::from_millis(100))
    }

    /// Sink that remembers the order of calls.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ResultSink<i64> for Recorder {
        fn record_track(&mut self, record: &TrackRecord<'_, i64>) {
            self.calls.push(format!(
                "track {} {} {:?}",
                record.algorithm.slug(),
                record.array_size,
                record.snapshot
            ));
        }

        fn record_comparison(&mut self, record: &ComparisonRecord) {
            self.calls.push(format!(
                "comparison {:?} {}",
                record.winner.map(Algorithm::slug),
                record.margin
            ));
        }
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut s = scheduler();
        let report = s.tick();
        assert!(report
            .as_ref()
            .is_ok_and(|r| r.state == RaceState::Idle && !r.redraw_needed()));
        assert_eq!(s.tick_count(), 0);
        assert!(s.snapshot().is_none());
        assert!(s.result().is_none());
    }

    #[test]
    fn test_run_to_completion_requires_comparison() {
        let mut s = scheduler();
        let err = s.run_to_completion(10);
        assert!(matches!(
            err,
            Err(RaceError::InvalidModeTransition {
                state: RaceState::Idle,
                ..
            })
        ));
    }

    #[test]
    fn test_sequential_bubble_vs_insertion() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Sequential);
        assert_eq!(s.state(), RaceState::Comparing);
        assert_eq!(s.mode(), Some(SchedulingMode::Sequential));

        // bubble: 4 swaps then exhaustion on tick 5; B untouched throughout
        for tick in 1..=5 {
            let report = s.tick();
            assert!(report.is_ok());
            let report = report.unwrap_or_else(|_| unreachable!());
            assert_eq!(report.tick, tick);
            assert_eq!(report.event(TrackId::B), TrackEvent::Skipped);
            assert_eq!(
                s.track(TrackId::B).map(Track::status),
                Some(TrackStatus::Idle)
            );
        }
        assert!(s.track(TrackId::A).is_some_and(Track::is_finished));

        let outcome = s.run_to_completion(1_000).ok().flatten().cloned();
        let Some(outcome) = outcome else {
            unreachable!("race settles well within budget");
        };

        // insertion: 7 steps on ticks 6..=12, exhaustion on tick 13
        assert_eq!(outcome.ticks, 13);
        assert_eq!(outcome.steps_a, 4);
        assert_eq!(outcome.steps_b, 7);
        assert_eq!(outcome.elapsed_a, ms(400));
        assert_eq!(outcome.elapsed_b, ms(700));
        assert_eq!(outcome.verdict, Verdict::Winner(TrackId::A));
        assert_eq!(outcome.winner_algorithm(), Some(Algorithm::Bubble));
        assert_eq!(outcome.margin, ms(300));

        let snapshot = s.snapshot();
        assert!(snapshot.is_some_and(|snap| {
            snap.array(TrackId::A) == [1, 3, 5, 8] && snap.array(TrackId::B) == [1, 3, 5, 8]
        }));
    }

    #[test]
    fn test_sequential_windows_do_not_overlap() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Heap, Algorithm::Merge, SchedulingMode::Sequential);
        assert!(s.run_to_completion(1_000).is_ok());

        let a_end = s.track(TrackId::A).and_then(Track::finished_at);
        let b_start = s.track(TrackId::B).and_then(Track::started_at);
        assert!(a_end.is_some() && b_start.is_some());
        assert!(a_end < b_start);
    }

    #[test]
    fn test_lockstep_advances_both_each_tick() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Lockstep);

        let first = s.tick();
        assert!(first.is_ok_and(|r| r.events == [TrackEvent::Stepped; 2]));

        let outcome = s.run_to_completion(1_000).ok().flatten().cloned();
        assert_eq!(outcome.as_ref().map(|o| o.ticks), Some(8));
        assert_eq!(outcome.as_ref().map(|o| o.elapsed_a), Some(ms(400)));
        assert_eq!(outcome.as_ref().map(|o| o.elapsed_b), Some(ms(700)));
        assert_eq!(outcome.map(|o| o.verdict), Some(Verdict::Winner(TrackId::A)));
    }

    #[test]
    fn test_lockstep_identical_algorithms_tie() {
        for algorithm in Algorithm::ALL {
            let mut s = scheduler();
            s.start_comparison(&BASELINE, algorithm, algorithm, SchedulingMode::Lockstep);
            let verdict = s.run_to_completion(1_000).ok().flatten().map(|o| o.verdict);
            assert_eq!(verdict, Some(Verdict::Tie), "{algorithm}");
        }
    }

    #[test]
    fn test_tie_tolerance_only_in_lockstep() {
        let mut lockstep = scheduler().with_tie_tolerance(ms(300));
        assert_eq!(lockstep.tie_tolerance(), ms(300));
        lockstep.start_comparison(&BASELINE, Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Lockstep);
        let verdict = lockstep.run_to_completion(1_000).ok().flatten().map(|o| o.verdict);
        assert_eq!(verdict, Some(Verdict::Tie));

        let mut sequential = scheduler().with_tie_tolerance(ms(300));
        sequential.start_comparison(&BASELINE, Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Sequential);
        let verdict = sequential.run_to_completion(1_000).ok().flatten().map(|o| o.verdict);
        assert_eq!(verdict, Some(Verdict::Winner(TrackId::A)));
    }

    #[test]
    fn test_result_only_when_settled() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Quick, Algorithm::Selection, SchedulingMode::Lockstep);
        assert!(s.tick().is_ok());
        assert!(s.result().is_none());
        assert!(s.run_to_completion(1_000).is_ok());
        assert_eq!(s.state(), RaceState::Settled);
        assert!(s.result().is_some());
    }

    #[test]
    fn test_settled_tick_is_noop() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Quick, Algorithm::Merge, SchedulingMode::Sequential);
        let before = s.run_to_completion(1_000).ok().flatten().cloned();
        let ticks = s.tick_count();

        let report = s.tick();
        assert!(report.is_ok_and(|r| r.state == RaceState::Settled && !r.redraw_needed()));
        assert_eq!(s.tick_count(), ticks);
        assert_eq!(s.result().cloned(), before);
    }

    #[test]
    fn test_cancel_discards_result() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Merge, Algorithm::Heap, SchedulingMode::Lockstep);
        assert!(s.tick().is_ok());

        s.cancel();
        assert_eq!(s.state(), RaceState::Idle);
        for _ in 0..50 {
            assert!(s.tick().is_ok());
        }
        assert!(s.result().is_none());
        assert!(s.snapshot().is_none());
    }

    #[test]
    fn test_cancel_after_settle() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Merge, Algorithm::Heap, SchedulingMode::Lockstep);
        assert!(s.run_to_completion(1_000).is_ok());
        s.cancel();
        assert!(s.result().is_none());
    }

    #[test]
    fn test_sinks_receive_settled_race_in_order() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut s = scheduler();
        s.add_sink(Box::new(Rc::clone(&recorder)));

        s.start_comparison(&BASELINE, Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Sequential);
        assert!(s.run_to_completion(1_000).is_ok());

        assert_eq!(
            recorder.borrow().calls,
            vec![
                "track bubble 4 [1, 3, 5, 8]".to_string(),
                "track insertion 4 [1, 3, 5, 8]".to_string(),
                "comparison Some(\"bubble\") 300.000ms".to_string(),
            ]
        );

        // settled ticks never re-emit
        assert!(s.tick().is_ok());
        assert_eq!(recorder.borrow().calls.len(), 3);
    }

    #[test]
    fn test_restart_discards_unfinished_run() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut s = scheduler();
        s.add_sink(Box::new(Rc::clone(&recorder)));

        s.start_comparison(&BASELINE, Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Sequential);
        assert!(s.tick().is_ok());
        s.start_comparison(&[2, 1], Algorithm::Heap, Algorithm::Quick, SchedulingMode::Lockstep);
        assert_eq!(s.tick_count(), 0);
        assert!(recorder.borrow().calls.is_empty());

        let outcome = s.run_to_completion(100).ok().flatten().cloned();
        assert_eq!(outcome.map(|o| o.array_size), Some(2));
        assert_eq!(recorder.borrow().calls.len(), 3);
    }

    #[test]
    fn test_trivial_baselines_settle_with_zero_elapsed() {
        for baseline in [vec![], vec![42_i64]] {
            let mut s = scheduler();
            s.start_comparison(&baseline, Algorithm::Quick, Algorithm::Heap, SchedulingMode::Sequential);
            let outcome = s.run_to_completion(10).ok().flatten().cloned();
            assert_eq!(outcome.as_ref().map(|o| o.ticks), Some(2));
            assert_eq!(outcome.as_ref().map(|o| o.elapsed_a), Some(SimTime::ZERO));
            assert_eq!(outcome.map(|o| o.verdict), Some(Verdict::Tie));
        }
    }

    #[test]
    fn test_tick_budget_exhausted() {
        let mut s = scheduler();
        s.start_comparison(&BASELINE, Algorithm::Bubble, Algorithm::Insertion, SchedulingMode::Sequential);
        let outcome = s.run_to_completion(3);
        assert!(outcome.is_ok_and(|o| o.is_none()));
        assert_eq!(s.state(), RaceState::Comparing);
        assert_eq!(s.tick_count(), 3);
    }

    #[test]
    fn test_guard_violation_aborts_run() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut s = scheduler();
        s.add_sink(Box::new(Rc::clone(&recorder)));
        s.start_comparison(&[2, 1], Algorithm::Bubble, Algorithm::Bubble, SchedulingMode::Sequential);

        // corrupt track A so it "finishes" with the wrong multiset
        if let Some(run) = s.run.as_mut() {
            run.tracks[0].data_mut().copy_from_slice(&[9, 9]);
        }

        let err = s.run_to_completion(100);
        assert!(matches!(
            err,
            Err(RaceError::SortInvariantViolation {
                algorithm: Algorithm::Bubble,
                index: 0
            })
        ));
        assert_eq!(s.state(), RaceState::Idle);
        assert!(s.result().is_none());
        assert!(recorder.borrow().calls.is_empty());
    }

    #[test]
    fn test_disabled_guard_lets_corruption_through() {
        let mut s = scheduler().with_guard(SortGuard::disabled());
        s.start_comparison(&[2, 1], Algorithm::Bubble, Algorithm::Bubble, SchedulingMode::Lockstep);
        if let Some(run) = s.run.as_mut() {
            run.tracks[0].data_mut().copy_from_slice(&[9, 9]);
        }
        assert!(s.run_to_completion(100).is_ok_and(|o| o.is_some()));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Lockstep".parse::<SchedulingMode>().ok(), Some(SchedulingMode::Lockstep));
        assert_eq!("sequential".parse::<SchedulingMode>().ok(), Some(SchedulingMode::Sequential));
        assert!("parallel".parse::<SchedulingMode>().is_err());
        assert_eq!(SchedulingMode::default(), SchedulingMode::Sequential);
        assert_eq!(RaceState::Settled.to_string(), "settled");
    }
}
