use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gasw::coordinator::CompletionReporter;
use gasw::errors::{GaswError, Result, SubmissionStage};
use gasw::exec::{ExecFuture, Executor, ExecutorContext, ExecutorSelector};
use gasw::job::{CompletionToken, JobHandle};
use gasw::proxy::UserProxy;
use gasw::types::ExecutionTarget;

/// What the fake selector and its executors were asked to do.
#[derive(Debug, Clone, Default)]
pub struct ExecutorLog {
    /// Every `(version, target)` the selector was called with.
    pub targets: Vec<ExecutionTarget>,
    pub pre_processed: usize,
    pub proxies: Vec<UserProxy>,
    pub submitted: Vec<JobHandle>,
}

/// Selector that hands out [`FakeExecutor`]s and records everything.
///
/// - Handles come from a queue set with [`FakeSelector::with_handles`],
///   then fall back to `job<n>--fake`.
/// - With `complete_on_submit`, each job reports itself finished (exit 0)
///   right after submission.
/// - `fail_at` injects a failure at one submission stage.
#[derive(Clone, Default)]
pub struct FakeSelector {
    log: Arc<Mutex<ExecutorLog>>,
    handles: Arc<Mutex<VecDeque<JobHandle>>>,
    counter: Arc<AtomicUsize>,
    complete_on_submit: bool,
    fail_at: Option<SubmissionStage>,
}

impl FakeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handles<I, S>(self, handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handles
            .lock()
            .unwrap()
            .extend(handles.into_iter().map(Into::into));
        self
    }

    pub fn complete_on_submit(mut self, val: bool) -> Self {
        self.complete_on_submit = val;
        self
    }

    pub fn fail_at(mut self, stage: SubmissionStage) -> Self {
        self.fail_at = Some(stage);
        self
    }

    pub fn log(&self) -> Arc<Mutex<ExecutorLog>> {
        Arc::clone(&self.log)
    }

    fn next_handle(&self) -> JobHandle {
        if let Some(h) = self.handles.lock().unwrap().pop_front() {
            return h;
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("job{n}--fake")
    }
}

impl ExecutorSelector for FakeSelector {
    fn executor(
        &self,
        target: &ExecutionTarget,
        ctx: ExecutorContext,
    ) -> Result<Box<dyn Executor>> {
        self.log.lock().unwrap().targets.push(target.clone());

        if self.fail_at == Some(SubmissionStage::ExecutorSelection) {
            return Err(GaswError::UnknownExecutor {
                version: target.version.clone(),
                target: target.target.clone(),
            });
        }

        Ok(Box::new(FakeExecutor {
            handle: self.next_handle(),
            reporter: ctx.reporter,
            log: Arc::clone(&self.log),
            complete_on_submit: self.complete_on_submit,
            fail_at: self.fail_at,
        }))
    }
}

pub struct FakeExecutor {
    handle: JobHandle,
    reporter: CompletionReporter,
    log: Arc<Mutex<ExecutorLog>>,
    complete_on_submit: bool,
    fail_at: Option<SubmissionStage>,
}

impl Executor for FakeExecutor {
    fn pre_process(&mut self) -> ExecFuture<'_, ()> {
        Box::pin(async move {
            self.log.lock().unwrap().pre_processed += 1;
            if self.fail_at == Some(SubmissionStage::PreProcess) {
                return Err(anyhow::anyhow!("injected pre-process failure").into());
            }
            Ok(())
        })
    }

    fn set_user_proxy(&mut self, proxy: UserProxy) {
        self.log.lock().unwrap().proxies.push(proxy);
    }

    fn submit(&mut self) -> ExecFuture<'_, JobHandle> {
        Box::pin(async move {
            if self.fail_at == Some(SubmissionStage::Submit) {
                return Err(anyhow::anyhow!("injected submit failure").into());
            }

            let handle = self.handle.clone();
            self.log.lock().unwrap().submitted.push(handle.clone());

            if self.complete_on_submit {
                self.reporter
                    .report(handle.clone(), CompletionToken::with_exit_code(0));
            }
            Ok(handle)
        })
    }
}
