// src/coordinator/state.rs

//! Shared bookkeeping behind the coordinator-wide lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, warn};

use crate::coordinator::client::GaswClient;
use crate::job::{CompletionToken, JobHandle};

/// State guarded by the coordinator lock.
#[derive(Debug, Default)]
pub(crate) struct State {
    /// Handles reported finished and not yet drained.
    pub finished: HashMap<JobHandle, CompletionToken>,
    /// Set by a drain, cleared by `wait_for_notification`.
    pub draining: bool,
    pub terminated: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Shared {
    state: Mutex<State>,
    /// First client to submit; never replaced.
    pub client: OnceLock<GaswClient>,
}

impl Shared {
    pub fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge backend-reported completions. Last write wins per handle.
    pub fn merge<I>(&self, mapping: I)
    where
        I: IntoIterator<Item = (JobHandle, CompletionToken)>,
    {
        let mut state = self.lock();
        if state.terminated {
            debug!("recording finished jobs after shutdown; they will not be announced");
        }
        for (handle, token) in mapping {
            debug!(handle = %handle, "job reported finished");
            if state.finished.insert(handle.clone(), token).is_some() {
                warn!(handle = %handle, "job reported finished twice before a drain; keeping the latest token");
            }
        }
    }
}

/// Cloneable handle backends use to report finished jobs.
#[derive(Debug, Clone)]
pub struct CompletionReporter {
    shared: Arc<Shared>,
}

impl CompletionReporter {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub fn report(&self, handle: JobHandle, token: CompletionToken) {
        self.shared.merge([(handle, token)]);
    }

    pub fn report_all(&self, mapping: HashMap<JobHandle, CompletionToken>) {
        self.shared.merge(mapping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_latest_token_per_handle() {
        let shared = Arc::new(Shared::default());
        let reporter = CompletionReporter::new(shared.clone());

        reporter.report("job1--a".to_string(), CompletionToken::with_exit_code(1));
        reporter.report_all(HashMap::from([
            ("job1--a".to_string(), CompletionToken::with_exit_code(2)),
            ("job2--b".to_string(), CompletionToken::with_exit_code(0)),
        ]));

        let state = shared.lock();
        assert_eq!(state.finished.len(), 2);
        assert_eq!(state.finished["job1--a"].exit_code, Some(2));
    }
}
