//! CLI output formatting.

use crate::config::RaceConfig;
use crate::engine::{RaceOutcome, TrackId, Verdict};
use crate::replay::ReproducibilitySummary;
use crate::report::RaceLedger;
use crate::sort::Algorithm;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!("sortrace {}", env!("SORTRACE_VERSION"));
    if let Some(hash) = option_env!("GIT_HASH").filter(|hash| !hash.is_empty()) {
        println!("git {hash}");
    }
    if let Some(timestamp) = option_env!("BUILD_TIMESTAMP") {
        println!("built {timestamp}");
    }
}

/// Print the algorithm catalog.
pub fn print_catalog() {
    println!("{RULE}");
    println!("Algorithms");
    println!("{RULE}\n");
    for algorithm in Algorithm::ALL {
        println!("  {:<10} {}", algorithm.slug(), algorithm.name());
        println!("             time:  {}", algorithm.time_complexity());
        println!("             space: {}", algorithm.space_complexity());
        println!("             {}\n", algorithm.description());
    }
}

/// One-line verdict, e.g. `Merge Sort wins by 300.000ms`.
#[must_use]
pub fn verdict_line(outcome: &RaceOutcome) -> String {
    match outcome.verdict {
        Verdict::Winner(track) => format!(
            "{} wins by {} (track {track})",
            outcome.algorithm(track),
            outcome.margin
        ),
        Verdict::Tie => format!("Tie (margin {})", outcome.margin),
    }
}

/// Print a settled race.
pub fn print_outcome(config: &RaceConfig, outcome: &RaceOutcome) {
    println!("{RULE}");
    println!(
        "Race: {} vs {}",
        outcome.algorithm_a, outcome.algorithm_b
    );
    println!(
        "Mode: {}  Clock: {}  Interval: {}",
        outcome.mode,
        config.playback.clock,
        config.tick_interval()
    );
    println!(
        "Baseline: {} elements in [{}, {}], seed {}",
        outcome.array_size, config.baseline.min, config.baseline.max, config.baseline.seed
    );
    println!("{RULE}\n");

    for track in [TrackId::A, TrackId::B] {
        let sym = if outcome.verdict.winner() == Some(track) {
            "✓"
        } else {
            " "
        };
        println!(
            "  {sym} Track {track}: {:<15} {:>14}  {:>8} steps",
            outcome.algorithm(track).name(),
            outcome.elapsed(track).to_string(),
            outcome.steps(track)
        );
    }

    println!("\n  Ticks: {}", outcome.ticks);
    println!("\n{RULE}");
    println!("{}", verdict_line(outcome));
    println!("{RULE}\n");
}

/// Print the per-algorithm statistics collected by a ledger.
pub fn print_ledger(ledger: &RaceLedger) {
    println!("Statistics:");
    println!("  Comparisons: {}", ledger.comparisons());
    println!("  Ties:        {}", ledger.ties());
    for (algorithm, stats) in ledger.iter() {
        let show = |time: Option<crate::engine::SimTime>| {
            time.map_or_else(|| "-".to_string(), |t| t.to_string())
        };
        println!(
            "  {:<15} runs {}  wins {}  avg {}  best {}  worst {}",
            algorithm.name(),
            stats.runs,
            stats.wins,
            show(stats.average()),
            show(stats.best),
            show(stats.worst)
        );
    }
}

/// Print a reproducibility summary.
pub fn print_reproducibility(summary: &ReproducibilitySummary) {
    let status = if summary.passed { "PASSED" } else { "FAILED" };
    let sym = if summary.passed { "✓" } else { "✗" };

    println!("{RULE}");
    println!("Reproducibility Check");
    println!("{RULE}\n");

    println!("  Runs:      {}", summary.runs);
    println!("  Identical: {}", summary.identical);
    println!("  Platform:  {}", summary.platform);
    println!("  Outcome:   {}", verdict_line(&summary.outcome));
    println!("\n  Reference Hash: {}", summary.reference_hash);

    if summary.run_hashes.len() > 1 {
        println!("\n  Run Hashes:");
        for (i, hash) in summary.run_hashes.iter().enumerate() {
            let match_sym = if hash == &summary.reference_hash {
                "="
            } else {
                "!"
            };
            println!("    Run {}: {} {}", i + 1, hash, match_sym);
        }
    }

    println!("\n{RULE}");
    println!("{sym} Result: {status}");
    println!("{RULE}\n");
}
