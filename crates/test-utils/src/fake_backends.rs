use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gasw::errors::{GaswError, Result};
use gasw::job::{CompletionToken, GaswExitCode, GaswOutput};
use gasw::monitor::Monitor;
use gasw::resolve::OutputResolver;
use gasw::types::Family;

/// Monitor with a fixed start time that counts `terminate` calls.
#[derive(Debug)]
pub struct FakeMonitor {
    start_time: i64,
    terminations: AtomicUsize,
}

impl FakeMonitor {
    pub fn new(start_time: i64) -> Self {
        Self {
            start_time,
            terminations: AtomicUsize::new(0),
        }
    }

    pub fn terminations(&self) -> usize {
        self.terminations.load(Ordering::SeqCst)
    }
}

impl Monitor for FakeMonitor {
    fn start_time(&self) -> i64 {
        self.start_time
    }

    fn terminate(&self) {
        self.terminations.fetch_add(1, Ordering::SeqCst);
    }
}

/// One `resolve` call: which family's resolver, for which job id, with
/// which start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveCall {
    pub family: Family,
    pub job_id: String,
    pub start_time: i64,
}

/// Resolver that records its calls and fails for selected job ids.
pub struct RecordingResolver {
    pub family: Family,
    pub start_time: i64,
    pub calls: Arc<Mutex<Vec<ResolveCall>>>,
    pub failing: Arc<Mutex<HashSet<String>>>,
}

impl OutputResolver for RecordingResolver {
    fn resolve(&self, job_id: &str, token: &CompletionToken) -> Result<GaswOutput> {
        if self.failing.lock().unwrap().contains(job_id) {
            return Err(GaswError::OutputResolution {
                job_id: job_id.to_string(),
                reason: "injected resolver failure".to_string(),
            });
        }

        self.calls.lock().unwrap().push(ResolveCall {
            family: self.family,
            job_id: job_id.to_string(),
            start_time: self.start_time,
        });

        Ok(GaswOutput {
            job_id: job_id.to_string(),
            family: self.family,
            exit_code: GaswExitCode::from(token.exit_code),
            stdout: token.stdout.clone(),
            stderr: token.stderr.clone(),
            start_time: self.start_time,
        })
    }
}
