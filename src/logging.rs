// src/logging.rs

//! Logging setup for `gasw` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `GASW_LOG` environment variable (e.g. "info", "debug")
//! 3. `[logging] level` from the config file
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that stdout carries only job outputs.

use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Install the global subscriber unless one is already installed.
///
/// Coordinator construction calls this too, so embedding applications (and
/// tests) that set up their own subscriber first keep it. Returns `true` if
/// this call installed the subscriber.
pub fn init_logging(cli_level: Option<LogLevel>, config_level: Option<&str>) -> bool {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("GASW_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .or_else(|| config_level.and_then(parse_level_str))
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_strings_are_case_insensitive() {
        assert_eq!(parse_level_str(" DEBUG "), Some(tracing::Level::DEBUG));
        assert_eq!(parse_level_str("warning"), Some(tracing::Level::WARN));
        assert_eq!(parse_level_str("verbose"), None);
    }
}
