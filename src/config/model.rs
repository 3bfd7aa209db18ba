// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{ExecutionTarget, GRID_DIRAC, VERSION_GRID};

/// Interval used by the completion notifier when none is configured.
pub const DEFAULT_NOTIFICATION_INTERVAL: Duration = Duration::from_secs(10);

/// Longest accepted notifier interval.
pub const MAX_NOTIFICATION_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [gasw]
/// version = "GRID"
/// target = "DIRAC"
/// notification_interval = "10s"
///
/// [local]
/// output_dir = ".gasw/out"
///
/// [proxy]
/// lifetime_hours = 12
/// myproxy_host = "myproxy.cern.ch"
///
/// [logging]
/// level = "info"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGaswConfig {
    #[serde(default)]
    pub gasw: CoreSection,

    #[serde(default)]
    pub local: LocalSection,

    #[serde(default)]
    pub proxy: ProxySection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[gasw]` section: default backend and notifier cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreSection {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_target")]
    pub target: String,

    /// Duration string with an `ms`, `s`, `m` or `h` suffix.
    #[serde(default = "default_notification_interval")]
    pub notification_interval: String,
}

fn default_version() -> String {
    VERSION_GRID.to_string()
}

fn default_target() -> String {
    GRID_DIRAC.to_string()
}

fn default_notification_interval() -> String {
    "10s".to_string()
}

impl Default for CoreSection {
    fn default() -> Self {
        Self {
            version: default_version(),
            target: default_target(),
            notification_interval: default_notification_interval(),
        }
    }
}

/// `[local]` section: where the local backend writes job stdout/stderr.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalSection {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".gasw/out")
}

impl Default for LocalSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// `[proxy]` section: delegation defaults used when a submission carries
/// credentials but no explicit servers.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySection {
    #[serde(default = "default_lifetime_hours")]
    pub lifetime_hours: u32,

    #[serde(default = "default_myproxy_host")]
    pub myproxy_host: String,

    #[serde(default = "default_myproxy_port")]
    pub myproxy_port: u16,

    #[serde(default = "default_voms_name")]
    pub voms_name: String,

    #[serde(default = "default_voms_host")]
    pub voms_host: String,

    #[serde(default = "default_voms_port")]
    pub voms_port: u16,
}

fn default_lifetime_hours() -> u32 {
    12
}

fn default_myproxy_host() -> String {
    "myproxy.cern.ch".to_string()
}

fn default_myproxy_port() -> u16 {
    7512
}

fn default_voms_name() -> String {
    "biomed".to_string()
}

fn default_voms_host() -> String {
    "cclcgvomsli01.in2p3.fr".to_string()
}

fn default_voms_port() -> u16 {
    15000
}

impl Default for ProxySection {
    fn default() -> Self {
        Self {
            lifetime_hours: default_lifetime_hours(),
            myproxy_host: default_myproxy_host(),
            myproxy_port: default_myproxy_port(),
            voms_name: default_voms_name(),
            voms_host: default_voms_host(),
            voms_port: default_voms_port(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    /// Fallback level when neither `--log-level` nor `GASW_LOG` is set.
    #[serde(default)]
    pub level: Option<String>,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawGaswConfig>` (or `Default`), so the
/// notifier interval and default target are known to be usable.
#[derive(Debug, Clone)]
pub struct GaswConfig {
    default_target: ExecutionTarget,
    notification_interval: Duration,
    pub local: LocalSection,
    pub proxy: ProxySection,
    pub logging: LoggingSection,
}

impl GaswConfig {
    pub(crate) fn new_unchecked(raw: RawGaswConfig, notification_interval: Duration) -> Self {
        Self {
            default_target: ExecutionTarget::new(raw.gasw.version, raw.gasw.target),
            notification_interval,
            local: raw.local,
            proxy: raw.proxy,
            logging: raw.logging,
        }
    }

    pub fn default_target(&self) -> &ExecutionTarget {
        &self.default_target
    }

    pub fn notification_interval(&self) -> Duration {
        self.notification_interval
    }

    /// Replace the default target (e.g. from the command line).
    pub fn with_default_target(mut self, target: ExecutionTarget) -> Self {
        self.default_target = target;
        self
    }

    /// Clamped to `1ms..=MAX_NOTIFICATION_INTERVAL`; a zero period is not a
    /// valid tick.
    pub fn with_notification_interval(mut self, interval: Duration) -> Self {
        self.notification_interval =
            interval.clamp(Duration::from_millis(1), MAX_NOTIFICATION_INTERVAL);
        self
    }

    pub fn with_local_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local.output_dir = dir.into();
        self
    }
}

impl Default for GaswConfig {
    fn default() -> Self {
        Self::new_unchecked(RawGaswConfig::default(), DEFAULT_NOTIFICATION_INTERVAL)
    }
}
