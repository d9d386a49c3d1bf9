//! sortrace CLI - race two sorting algorithms step by step.

use clap::Parser;
use std::process::ExitCode;

use sortrace::cli::{run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    sortrace::logging::init(args.verbose);
    run_cli(args)
}
