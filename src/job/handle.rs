// src/job/handle.rs

//! Job handle format.
//!
//! A handle is `"<jobId>--<backendSpecificSuffix>"`. Handles produced by the
//! local backend start with `"Local-"`; every other handle belongs to the
//! grid family.

use crate::types::Family;

/// Identifier returned by a successful submission.
pub type JobHandle = String;

/// Marker that starts every handle of the local family.
pub const LOCAL_PREFIX: &str = "Local-";

/// Separator between the job id and the backend-specific suffix.
pub const HANDLE_SEPARATOR: &str = "--";

/// Infrastructure family owning `handle`.
pub fn family_of(handle: &str) -> Family {
    if handle.starts_with(LOCAL_PREFIX) {
        Family::Local
    } else {
        Family::Grid
    }
}

/// Job id portion of `handle` (everything before the first `--`).
///
/// A handle without a separator is its own job id.
pub fn job_id_of(handle: &str) -> &str {
    handle
        .split_once(HANDLE_SEPARATOR)
        .map(|(id, _)| id)
        .unwrap_or(handle)
}

pub fn format_handle(job_id: &str, suffix: &str) -> JobHandle {
    format!("{job_id}{HANDLE_SEPARATOR}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_prefix_selects_local_family() {
        assert_eq!(family_of("Local-42--foo"), Family::Local);
        assert_eq!(family_of("job7--bar"), Family::Grid);
        // The marker only counts at the start.
        assert_eq!(family_of("job-Local-1--x"), Family::Grid);
    }

    #[test]
    fn job_id_is_left_of_first_separator() {
        assert_eq!(job_id_of("job1--h1"), "job1");
        assert_eq!(job_id_of("Local-42--foo--bar"), "Local-42");
        assert_eq!(job_id_of("plain"), "plain");
        assert_eq!(job_id_of("--suffix"), "");
    }

    #[test]
    fn format_then_split_keeps_job_id() {
        let handle = format_handle("Local-echo-3", "1234");
        assert_eq!(handle, "Local-echo-3--1234");
        assert_eq!(job_id_of(&handle), "Local-echo-3");
    }
}
