//! Logging module - Diagnostic logger bootstrap
//!
//! Human-facing output goes through [`crate::core::utils`]; this logger only
//! carries diagnostics on stderr. `RUST_LOG` overrides the level chosen from
//! the command-line flags.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

const SUPPORTED_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Level implied by `--verbose` / `--quiet`
pub fn level_for(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Starts the stderr logger; keep the returned handle alive for the process
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    Logger::try_with_env_or_str(level)
        .context("Invalid log specification")?
        .log_to_stderr()
        .format(flexi_logger::colored_default_format)
        .start()
        .context("Failed to start logger")
}

fn normalize_level(level: &str) -> Result<&'static str> {
    let normalized = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS
        .iter()
        .copied()
        .find(|candidate| *candidate == normalized)
        .with_context(|| format!("Unsupported log level: {level}"))
}
