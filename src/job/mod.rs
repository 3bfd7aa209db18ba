// src/job/mod.rs

//! Job-level data: what gets submitted, how it is identified afterwards,
//! and what a drained job resolves to.
//!
//! - [`input`] is the immutable job descriptor (`GaswInput`).
//! - [`handle`] parses submission handles (`"<jobId>--<suffix>"`).
//! - [`output`] holds completion tokens and resolved outputs.

pub mod handle;
pub mod input;
pub mod output;

pub use handle::{HANDLE_SEPARATOR, JobHandle, LOCAL_PREFIX, family_of, format_handle, job_id_of};
pub use input::{Category, EnvVariable, GaswInput, JobFile, Release};
pub use output::{CompletionToken, GaswExitCode, GaswOutput};
