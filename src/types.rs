use std::fmt;

use serde::Deserialize;

/// Default backend version used when the caller does not pick one.
pub const VERSION_GRID: &str = "GRID";
/// Version name of the local execution backend.
pub const VERSION_LOCAL: &str = "LOCAL";
/// Default grid target.
pub const GRID_DIRAC: &str = "DIRAC";
/// Target name of the local execution backend.
pub const TARGET_LOCAL: &str = "LOCAL";

/// Name of the SYSTEM configuration entry that overrides the target per job.
pub const GRID_TARGET_VARIABLE: &str = "gridTarget";

/// Infrastructure family owning a job handle.
///
/// Monitors and output resolvers are registered per family, not per
/// `(version, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Local,
    Grid,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Local => f.write_str("LOCAL"),
            Family::Grid => f.write_str("GRID"),
        }
    }
}

/// `(version, target)` pair selecting an executor implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionTarget {
    pub version: String,
    pub target: String,
}

impl ExecutionTarget {
    pub fn new(version: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            target: target.into(),
        }
    }

    /// The local backend pair.
    pub fn local() -> Self {
        Self::new(VERSION_LOCAL, TARGET_LOCAL)
    }

    /// Same version, different target.
    pub fn with_target(&self, target: impl Into<String>) -> Self {
        Self {
            version: self.version.clone(),
            target: target.into(),
        }
    }
}

impl Default for ExecutionTarget {
    fn default() -> Self {
        Self::new(VERSION_GRID, GRID_DIRAC)
    }
}

impl fmt::Display for ExecutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.version, self.target)
    }
}
