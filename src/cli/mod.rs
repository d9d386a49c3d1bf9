//! CLI module for sortrace.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested. The
//! entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RaceOptions};
pub use commands::{race_with_config, run_cli};
pub use output::{print_catalog, print_ledger, print_outcome, print_reproducibility, print_version, verdict_line};

#[cfg(test)]
mod tests;
