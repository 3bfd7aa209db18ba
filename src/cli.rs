// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gasw`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gasw",
    version,
    about = "Submit jobs to pluggable execution backends and collect their outputs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// A missing file means "use the defaults".
    #[arg(long, value_name = "PATH", default_value = "gasw.toml")]
    pub config: String,

    /// Path to the job file (TOML, a list of `[[job]]` tables).
    #[arg(long, value_name = "PATH")]
    pub jobs: String,

    /// Override the configured default backend version (e.g. LOCAL).
    #[arg(long, value_name = "VERSION")]
    pub backend_version: Option<String>,

    /// Override the configured default target (e.g. LOCAL).
    #[arg(long, value_name = "TARGET")]
    pub target: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GASW_LOG`, then `[logging] level`, then `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print where each job would go, submit nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = CliArgs::try_parse_from([
            "gasw",
            "--jobs",
            "jobs.toml",
            "--backend-version",
            "LOCAL",
            "--target",
            "LOCAL",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.config, "gasw.toml");
        assert_eq!(args.jobs, "jobs.toml");
        assert_eq!(args.backend_version.as_deref(), Some("LOCAL"));
        assert!(args.dry_run);
    }

    #[test]
    fn jobs_is_required() {
        assert!(CliArgs::try_parse_from(["gasw"]).is_err());
    }
}
