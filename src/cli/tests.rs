//! CLI module tests.

use clap::Parser;
use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use super::args::{Args, Command, RaceOptions};
use super::commands::{race_with_config, run_cli, run_race, verify_reproducibility};
use super::output::{print_catalog, print_ledger, print_outcome, print_reproducibility, verdict_line};
use crate::config::{ClockKind, RaceConfig};
use crate::engine::{SchedulingMode, SimTime, TrackId, Verdict};
use crate::error::RaceError;
use crate::replay;
use crate::report::RaceLedger;
use crate::sort::Algorithm;

fn parse(argv: &[&str]) -> Option<Args> {
    Args::try_parse_from(argv).ok()
}

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_is_error() {
    assert!(parse(&["sortrace"]).is_none());
}

#[test]
fn test_parse_list_and_version() {
    assert_eq!(parse(&["sortrace", "list"]).map(|a| a.command), Some(Command::List));
    assert_eq!(
        parse(&["sortrace", "version"]).map(|a| a.command),
        Some(Command::Version)
    );
}

#[test]
fn test_parse_race_defaults() {
    let args = parse(&["sortrace", "race"]);
    assert_eq!(
        args.map(|a| a.command),
        Some(Command::Race {
            options: RaceOptions::default(),
            json: false,
        })
    );
}

#[test]
fn test_parse_race_all_options() {
    let args = parse(&[
        "sortrace",
        "race",
        "--left",
        "bubble",
        "--right",
        "Heap Sort",
        "--mode",
        "lockstep",
        "--size",
        "32",
        "--seed",
        "7",
        "--speed",
        "5",
        "--clock",
        "wall",
        "--tolerance-ms",
        "12.5",
        "--json",
        "-v",
    ]);
    let Some(args) = args else {
        unreachable!("all options are valid");
    };
    assert!(args.verbose);
    let Command::Race { options, json } = args.command else {
        unreachable!("race command");
    };
    assert!(json);
    assert_eq!(options.left, Some(Algorithm::Bubble));
    assert_eq!(options.right, Some(Algorithm::Heap));
    assert_eq!(options.mode, Some(SchedulingMode::Lockstep));
    assert_eq!(options.size, Some(32));
    assert_eq!(options.seed, Some(7));
    assert_eq!(options.speed, Some(5));
    assert_eq!(options.clock, Some(ClockKind::Wall));
    assert_eq!(options.tolerance_ms, Some(12.5));
}

#[test]
fn test_parse_rejects_unknown_algorithm() {
    assert!(parse(&["sortrace", "race", "--left", "bogo"]).is_none());
}

#[test]
fn test_parse_rejects_unknown_mode() {
    assert!(parse(&["sortrace", "race", "--mode", "sideways"]).is_none());
}

#[test]
fn test_parse_verify_runs() {
    let args = parse(&["sortrace", "verify", "--runs", "5", "--seed", "9"]);
    let Some(Command::Verify { options, runs }) = args.map(|a| a.command) else {
        unreachable!("verify command");
    };
    assert_eq!(runs, 5);
    assert_eq!(options.seed, Some(9));
}

#[test]
fn test_parse_verify_default_runs() {
    let args = parse(&["sortrace", "verify"]);
    assert!(matches!(
        args.map(|a| a.command),
        Some(Command::Verify { runs: 3, .. })
    ));
}

// ============================================================================
// Option resolution tests
// ============================================================================

#[test]
fn test_resolve_defaults() {
    let config = RaceOptions::default().resolve().ok();
    assert_eq!(config, Some(RaceConfig::default()));
}

#[test]
fn test_resolve_overrides() {
    let options = RaceOptions {
        left: Some(Algorithm::Selection),
        mode: Some(SchedulingMode::Lockstep),
        size: Some(20),
        speed: Some(2),
        tolerance_ms: Some(100.0),
        ..RaceOptions::default()
    };
    let Ok(config) = options.resolve() else {
        unreachable!("overrides are valid");
    };
    assert_eq!(config.race.left, Algorithm::Selection);
    assert_eq!(config.race.right, Algorithm::Quick);
    assert_eq!(config.baseline.size, 20);
    assert_eq!(config.tick_interval(), SimTime::from_millis(50));
    assert_eq!(config.tie_tolerance().ok(), Some(SimTime::from_millis(100)));
}

#[test]
fn test_resolve_validates_overrides() {
    let options = RaceOptions {
        speed: Some(11),
        ..RaceOptions::default()
    };
    assert!(matches!(options.resolve(), Err(RaceError::Validation(_))));

    let options = RaceOptions {
        tolerance_ms: Some(-5.0),
        ..RaceOptions::default()
    };
    assert!(options.resolve().is_err());
}

#[test]
fn test_resolve_missing_file() {
    let options = RaceOptions {
        config: Some("nonexistent.yaml".into()),
        ..RaceOptions::default()
    };
    assert!(matches!(options.resolve(), Err(RaceError::Io(_))));
}

#[test]
fn test_resolve_file_then_override() {
    let temp_file = std::env::temp_dir().join("sortrace_cli_resolve.yaml");
    let yaml = "baseline: { size: 16, seed: 5 }\nrace: { left: heap, right: merge }\n";
    assert!(std::fs::write(&temp_file, yaml).is_ok());

    let options = RaceOptions {
        config: Some(temp_file.clone()),
        seed: Some(6),
        ..RaceOptions::default()
    };
    let config = options.resolve().ok();
    let _ = std::fs::remove_file(&temp_file);

    let Some(config) = config else {
        unreachable!("file is valid");
    };
    assert_eq!(config.baseline.size, 16);
    assert_eq!(config.baseline.seed, 6);
    assert_eq!(config.race.left, Algorithm::Heap);
    assert_eq!(config.race.right, Algorithm::Merge);
}

// ============================================================================
// Command handler tests
// ============================================================================

fn small_options() -> RaceOptions {
    RaceOptions {
        size: Some(24),
        seed: Some(3),
        ..RaceOptions::default()
    }
}

#[test]
fn test_run_cli_version() {
    let args = Args::parse_from(["sortrace", "version"]);
    assert_eq!(run_cli(args), ExitCode::SUCCESS);
}

#[test]
fn test_run_cli_list() {
    let args = Args::parse_from(["sortrace", "list"]);
    assert_eq!(run_cli(args), ExitCode::SUCCESS);
}

#[test]
fn test_run_race_success() {
    assert_eq!(run_race(&small_options(), false), ExitCode::SUCCESS);
    assert_eq!(run_race(&small_options(), true), ExitCode::SUCCESS);
}

#[test]
fn test_run_race_invalid_config() {
    let options = RaceOptions {
        speed: Some(0),
        ..RaceOptions::default()
    };
    assert_ne!(run_race(&options, false), ExitCode::SUCCESS);
}

#[test]
fn test_run_race_file_not_found() {
    let options = RaceOptions {
        config: Some("nonexistent.yaml".into()),
        ..RaceOptions::default()
    };
    assert_ne!(run_race(&options, false), ExitCode::SUCCESS);
}

#[test]
fn test_verify_reproducibility_passes() {
    assert_eq!(verify_reproducibility(&small_options(), 2), ExitCode::SUCCESS);
}

#[test]
fn test_verify_reproducibility_zero_runs() {
    assert_ne!(verify_reproducibility(&small_options(), 0), ExitCode::SUCCESS);
}

#[test]
fn test_race_with_config_feeds_ledger() {
    let Ok(config) = small_options().resolve() else {
        unreachable!("small options are valid");
    };
    let ledger = Rc::new(RefCell::new(RaceLedger::new()));
    let outcome = race_with_config(&config, &ledger);

    let Ok(outcome) = outcome else {
        unreachable!("race settles");
    };
    assert_eq!(outcome.array_size, 24);
    assert_eq!(ledger.borrow().comparisons(), 1);
    assert_eq!(
        ledger.borrow().stats(Algorithm::Merge).map(|s| s.runs),
        Some(1)
    );
}

#[test]
fn test_race_with_wall_clock_settles() {
    // speed 10 keeps the real sleep at 10ms per tick
    let options = RaceOptions {
        size: Some(3),
        speed: Some(10),
        clock: Some(ClockKind::Wall),
        left: Some(Algorithm::Bubble),
        right: Some(Algorithm::Insertion),
        ..RaceOptions::default()
    };
    let Ok(config) = options.resolve() else {
        unreachable!("wall options are valid");
    };
    let ledger = Rc::new(RefCell::new(RaceLedger::new()));
    let outcome = race_with_config(&config, &ledger).ok();
    assert!(outcome.is_some());
    assert_eq!(ledger.borrow().comparisons(), 1);
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_verdict_line() {
    let Ok(config) = small_options().resolve() else {
        unreachable!("small options are valid");
    };
    let Ok(run) = replay::run_simulated(&config) else {
        unreachable!("race settles");
    };
    let mut outcome = run.outcome;

    outcome.verdict = Verdict::Winner(TrackId::B);
    outcome.margin = SimTime::from_millis(300);
    assert_eq!(
        verdict_line(&outcome),
        format!("{} wins by 300.000ms (track B)", outcome.algorithm_b)
    );

    outcome.verdict = Verdict::Tie;
    outcome.margin = SimTime::ZERO;
    assert_eq!(verdict_line(&outcome), "Tie (margin 0.000ms)");
}

#[test]
fn test_print_functions_do_not_panic() {
    let Ok(config) = small_options().resolve() else {
        unreachable!("small options are valid");
    };
    let ledger = Rc::new(RefCell::new(RaceLedger::new()));
    let Ok(outcome) = race_with_config(&config, &ledger) else {
        unreachable!("race settles");
    };
    print_outcome(&config, &outcome);
    print_ledger(&ledger.borrow());
    print_catalog();

    let Ok(summary) = replay::verify_reproducibility(&config, 2) else {
        unreachable!("verification runs");
    };
    print_reproducibility(&summary);
}
