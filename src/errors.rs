// src/errors.rs

//! Crate-wide error type and result alias.

use std::fmt;

use thiserror::Error;

use crate::types::Family;

/// Step of the submission path that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    /// Looking up / constructing the executor for `(version, target)`.
    ExecutorSelection,
    /// The executor's pre-submission hook.
    PreProcess,
    /// The actual submission.
    Submit,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubmissionStage::ExecutorSelection => "executor selection",
            SubmissionStage::PreProcess => "pre-processing",
            SubmissionStage::Submit => "submission",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum GaswError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Submission failed during {stage}: {source}")]
    Submission {
        stage: SubmissionStage,
        #[source]
        source: Box<GaswError>,
    },

    #[error("no executor registered for version '{version}' and target '{target}'")]
    UnknownExecutor { version: String, target: String },

    #[error("no {kind} registered for {family} jobs")]
    UnknownFamily { kind: &'static str, family: Family },

    #[error("failed to resolve output of job '{job_id}': {reason}")]
    OutputResolution { job_id: String, reason: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GaswError {
    pub(crate) fn submission(stage: SubmissionStage, source: GaswError) -> Self {
        GaswError::Submission {
            stage,
            source: Box::new(source),
        }
    }

    /// Stage of a submission failure, if this is one.
    pub fn submission_stage(&self) -> Option<SubmissionStage> {
        match self {
            GaswError::Submission { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GaswError>;
