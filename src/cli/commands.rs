//! CLI command handlers.

use log::info;
use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use crate::config::{ClockKind, RaceConfig};
use crate::engine::{DualTrackScheduler, RaceOutcome, RaceState, SimClock, TickClock, WallClock};
use crate::error::{RaceError, RaceResult};
use crate::replay;
use crate::report::RaceLedger;

use super::output::{
    print_catalog, print_ledger, print_outcome, print_reproducibility, print_version,
};
use super::{Args, Command, RaceOptions};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Race { options, json } => run_race(&options, json),
        Command::Verify { options, runs } => verify_reproducibility(&options, runs),
        Command::List => {
            print_catalog();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Run one race and print its outcome.
#[must_use]
pub fn run_race(options: &RaceOptions, json: bool) -> ExitCode {
    let config = match options.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if !json {
        println!("╔═══════════════════════════════════════════════════════════════╗");
        println!("║                  sortrace - Dual-Track Race                   ║");
        println!("╚═══════════════════════════════════════════════════════════════╝\n");
    }

    let ledger = Rc::new(RefCell::new(RaceLedger::new()));
    match race_with_config(&config, &ledger) {
        Ok(outcome) => {
            if json {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::from(1);
                    }
                }
            } else {
                print_outcome(&config, &outcome);
                print_ledger(&ledger.borrow());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run the configured race on the configured clock.
///
/// With the wall clock the loop sleeps one tick interval between ticks, so
/// elapsed times reflect real pacing.
///
/// # Errors
///
/// Returns configuration errors or the fault that aborted the race.
pub fn race_with_config(
    config: &RaceConfig,
    ledger: &Rc<RefCell<RaceLedger>>,
) -> RaceResult<RaceOutcome> {
    let interval = config.tick_interval();
    match config.playback.clock {
        ClockKind::Simulated => drive(
            config,
            SimClock::from_nanos(interval.as_nanos()),
            None,
            ledger,
        ),
        ClockKind::Wall => drive(
            config,
            WallClock::new(),
            Some(Duration::from_nanos(interval.as_nanos())),
            ledger,
        ),
    }
}

fn drive<C: TickClock>(
    config: &RaceConfig,
    clock: C,
    pace: Option<Duration>,
    ledger: &Rc<RefCell<RaceLedger>>,
) -> RaceResult<RaceOutcome> {
    let baseline = config.baseline()?;
    let mut scheduler: DualTrackScheduler<i64, C> = DualTrackScheduler::new(clock)
        .with_tie_tolerance(config.tie_tolerance()?)
        .with_guard(config.sort_guard());
    scheduler.add_sink(Box::new(Rc::clone(ledger)));

    scheduler.start_comparison(&baseline, config.race.left, config.race.right, config.race.mode);
    while scheduler.state() == RaceState::Comparing {
        let report = scheduler.tick()?;
        if report.state == RaceState::Comparing {
            if let Some(pace) = pace {
                std::thread::sleep(pace);
            }
        }
    }

    info!("Race finished after {} ticks", scheduler.tick_count());
    scheduler
        .result()
        .cloned()
        .ok_or_else(|| RaceError::config("race ended without a result"))
}

/// Verify that the configured race replays identically.
#[must_use]
pub fn verify_reproducibility(options: &RaceOptions, runs: usize) -> ExitCode {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║        sortrace - Reproducibility Verification                ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let config = match options.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    println!(
        "Verifying reproducibility: {} vs {} ({}, seed {})",
        config.race.left, config.race.right, config.race.mode, config.baseline.seed
    );
    println!("Runs: {runs}\n");

    match replay::verify_reproducibility(&config, runs) {
        Ok(summary) => {
            print_reproducibility(&summary);
            if summary.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
