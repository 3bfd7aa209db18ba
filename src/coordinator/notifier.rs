// src/coordinator/notifier.rs

//! Completion notifier: the background task that wakes the registered
//! client when finished jobs are waiting to be drained.
//!
//! It only says "something is ready"; the client drains with
//! `Coordinator::get_finished_jobs` itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use super::state::Shared;

/// Owner's side of the notifier task.
#[derive(Debug)]
pub(crate) struct NotifierHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl NotifierHandle {
    /// Cancel the loop and wait for it to exit.
    ///
    /// A failed task (panic) is logged, not returned.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Err(err) = (&mut self.task).await {
            error!(error = %err, "completion notifier task ended abnormally");
        }
    }
}

impl Drop for NotifierHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub(crate) fn spawn_notifier(
    runtime: &Handle,
    shared: Arc<Shared>,
    interval: Duration,
) -> NotifierHandle {
    let cancel = CancellationToken::new();
    let task = runtime.spawn(run(shared, interval, cancel.clone()));
    NotifierHandle { cancel, task }
}

async fn run(shared: Arc<Shared>, interval: Duration, cancel: CancellationToken) {
    info!(?interval, "completion notifier started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if !poll_once(&shared) {
                    break;
                }
            }
        }
    }

    info!("completion notifier stopped");
}

/// One poll: wake the client if jobs are pending and no drain is running.
///
/// Returns `false` once the coordinator has been terminated.
pub(crate) fn poll_once(shared: &Shared) -> bool {
    let state = shared.lock();

    if state.terminated {
        return false;
    }
    if state.draining {
        trace!("drain in progress; not waking client");
        return true;
    }
    if state.finished.is_empty() {
        return true;
    }

    match shared.client.get() {
        Some(client) => {
            debug!(pending = state.finished.len(), "waking client");
            client.wake();
        }
        None => debug!(
            pending = state.finished.len(),
            "finished jobs pending but no client registered"
        ),
    }
    true
}
