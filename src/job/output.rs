// src/job/output.rs

use std::path::PathBuf;

use crate::types::Family;

/// Completion token reported by a backend when a job has finished.
///
/// The coordinator never looks inside; it is handed to the output resolver
/// of the job's family during a drain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionToken {
    /// Process exit code, `None` when the job did not exit normally.
    pub exit_code: Option<i32>,
    pub stdout: Option<PathBuf>,
    pub stderr: Option<PathBuf>,
}

impl CompletionToken {
    pub fn with_exit_code(exit_code: i32) -> Self {
        Self {
            exit_code: Some(exit_code),
            ..Self::default()
        }
    }
}

/// Final status of a resolved job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaswExitCode {
    Success,
    ExecutionFailed(i32),
    /// No exit code (e.g. killed by a signal).
    Cancelled,
}

impl From<Option<i32>> for GaswExitCode {
    fn from(code: Option<i32>) -> Self {
        match code {
            Some(0) => GaswExitCode::Success,
            Some(c) => GaswExitCode::ExecutionFailed(c),
            None => GaswExitCode::Cancelled,
        }
    }
}

/// Structured result of one finished job, keyed by its job id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaswOutput {
    pub job_id: String,
    pub family: Family,
    pub exit_code: GaswExitCode,
    pub stdout: Option<PathBuf>,
    pub stderr: Option<PathBuf>,
    /// Start time reported by the family's monitor (unix seconds).
    pub start_time: i64,
}
