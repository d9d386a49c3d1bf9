//! Minimal `log` backend writing to stderr.
//!
//! The level comes from `RUST_LOG` (error, warn, info, debug, trace) and
//! defaults to warn; `--verbose` raises it to debug.

use log::{LevelFilter, Log, Metadata, Record};
use std::sync::OnceLock;

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Parse a `RUST_LOG`-style level name.
#[must_use]
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Resolve the effective level from the environment and the verbose flag.
#[must_use]
pub fn resolve_level(env: Option<&str>, verbose: bool) -> LevelFilter {
    let level = env.and_then(parse_level).unwrap_or(LevelFilter::Warn);
    if verbose {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}

/// Install the stderr logger. Later calls keep the first logger.
pub fn init(verbose: bool) -> LevelFilter {
    let env = std::env::var("RUST_LOG").ok();
    let level = resolve_level(env.as_deref(), verbose);

    let logger = LOGGER.get_or_init(|| StderrLogger { level });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
    logger.level
}
