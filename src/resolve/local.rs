// src/resolve/local.rs

use tracing::debug;

use crate::errors::{GaswError, Result};
use crate::job::{CompletionToken, GaswExitCode, GaswOutput};
use crate::resolve::OutputResolver;
use crate::types::Family;

/// Resolver for tokens reported by the local executor.
#[derive(Debug, Clone, Copy)]
pub struct LocalOutputResolver {
    start_time: i64,
}

impl LocalOutputResolver {
    pub fn new(start_time: i64) -> Self {
        Self { start_time }
    }
}

impl OutputResolver for LocalOutputResolver {
    fn resolve(&self, job_id: &str, token: &CompletionToken) -> Result<GaswOutput> {
        for path in [&token.stdout, &token.stderr].into_iter().flatten() {
            if !path.exists() {
                return Err(GaswError::OutputResolution {
                    job_id: job_id.to_string(),
                    reason: format!("output file {} does not exist", path.display()),
                });
            }
        }

        let exit_code = GaswExitCode::from(token.exit_code);
        debug!(job_id, ?exit_code, "resolved local job output");

        Ok(GaswOutput {
            job_id: job_id.to_string(),
            family: Family::Local,
            exit_code,
            stdout: token.stdout.clone(),
            stderr: token.stderr.clone(),
            start_time: self.start_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_map_to_status() {
        let resolver = LocalOutputResolver::new(7);

        let ok = resolver.resolve("Local-a-1", &CompletionToken::with_exit_code(0)).unwrap();
        assert_eq!(ok.exit_code, GaswExitCode::Success);
        assert_eq!(ok.start_time, 7);
        assert_eq!(ok.family, Family::Local);

        let failed = resolver.resolve("Local-a-2", &CompletionToken::with_exit_code(3)).unwrap();
        assert_eq!(failed.exit_code, GaswExitCode::ExecutionFailed(3));

        let killed = resolver.resolve("Local-a-3", &CompletionToken::default()).unwrap();
        assert_eq!(killed.exit_code, GaswExitCode::Cancelled);
    }

    #[test]
    fn missing_output_file_fails_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let token = CompletionToken {
            exit_code: Some(0),
            stdout: Some(dir.path().join("nope.out")),
            stderr: None,
        };

        match LocalOutputResolver::new(0).resolve("Local-x-1", &token) {
            Err(GaswError::OutputResolution { job_id, reason }) => {
                assert_eq!(job_id, "Local-x-1");
                assert!(reason.contains("nope.out"));
            }
            other => panic!("expected OutputResolution, got {other:?}"),
        }
    }
}
