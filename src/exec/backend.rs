// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The coordinator never talks to an infrastructure directly. For every
//! submission it asks an [`ExecutorSelector`] for an [`Executor`] bound to
//! that one job, runs its pre-submission hook, optionally attaches a user
//! proxy, and submits.
//!
//! - [`ExecutorRegistry`] is the selector used in production: a map from
//!   `(version, target)` to a constructor.
//! - Tests provide their own selector that records what it was asked for.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::coordinator::CompletionReporter;
use crate::errors::{GaswError, Result};
use crate::exec::local::LocalExecutor;
use crate::job::{GaswInput, JobHandle};
use crate::proxy::UserProxy;
use crate::types::{ExecutionTarget, TARGET_LOCAL};

/// Boxed future returned by executor operations.
pub type ExecFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// One job's view of an execution backend.
///
/// Retrying, if any, is up to the implementation; the coordinator calls each
/// method at most once.
pub trait Executor: Send {
    /// Prepare the submission (scripts, directories, ...).
    fn pre_process(&mut self) -> ExecFuture<'_, ()>;

    /// Attach the delegated security context. Only called when the
    /// submission carried credentials.
    fn set_user_proxy(&mut self, proxy: UserProxy);

    /// Submit the job and return its handle.
    ///
    /// The implementation reports completion later through the
    /// [`CompletionReporter`] it was built with.
    fn submit(&mut self) -> ExecFuture<'_, JobHandle>;
}

/// Everything an executor needs besides its target.
#[derive(Debug, Clone)]
pub struct ExecutorContext {
    pub input: GaswInput,
    pub reporter: CompletionReporter,
}

/// Picks an executor for a `(version, target)` pair.
pub trait ExecutorSelector: Send + Sync {
    fn executor(
        &self,
        target: &ExecutionTarget,
        ctx: ExecutorContext,
    ) -> Result<Box<dyn Executor>>;
}

type ExecutorConstructor = Arc<dyn Fn(ExecutorContext) -> Result<Box<dyn Executor>> + Send + Sync>;

/// Selector backed by a map of registered constructors.
///
/// An exact `(version, target)` registration wins over one registered for
/// a target under any version.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    constructors: HashMap<ExecutionTarget, ExecutorConstructor>,
    any_version: HashMap<String, ExecutorConstructor>,
}

impl fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("targets", &self.constructors.keys().collect::<Vec<_>>())
            .field("any_version", &self.any_version.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `target`, replacing any previous one.
    pub fn with<F>(mut self, target: ExecutionTarget, constructor: F) -> Self
    where
        F: Fn(ExecutorContext) -> Result<Box<dyn Executor>> + Send + Sync + 'static,
    {
        self.constructors.insert(target, Arc::new(constructor));
        self
    }

    /// Register a constructor for the target name `target`, whatever the
    /// version.
    pub fn with_any_version<F>(mut self, target: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(ExecutorContext) -> Result<Box<dyn Executor>> + Send + Sync + 'static,
    {
        self.any_version.insert(target.into(), Arc::new(constructor));
        self
    }

    /// Register the local backend for target `LOCAL` under every version,
    /// writing job output below `output_dir`.
    ///
    /// A job's `gridTarget = "LOCAL"` only replaces the target, so it must
    /// reach this backend from the default `GRID` version too.
    pub fn with_local(self, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        self.with_any_version(TARGET_LOCAL, move |ctx| {
            Ok(Box::new(LocalExecutor::new(ctx, output_dir.clone())) as Box<dyn Executor>)
        })
    }

    fn constructor(&self, target: &ExecutionTarget) -> Option<&ExecutorConstructor> {
        self.constructors
            .get(target)
            .or_else(|| self.any_version.get(&target.target))
    }
}

impl ExecutorSelector for ExecutorRegistry {
    fn executor(
        &self,
        target: &ExecutionTarget,
        ctx: ExecutorContext,
    ) -> Result<Box<dyn Executor>> {
        let constructor = self
            .constructor(target)
            .ok_or_else(|| GaswError::UnknownExecutor {
                version: target.version.clone(),
                target: target.target.clone(),
            })?;
        constructor(ctx)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::coordinator::state::Shared;

    struct Tagged(&'static str);

    impl Executor for Tagged {
        fn pre_process(&mut self) -> ExecFuture<'_, ()> {
            Box::pin(async { Ok(()) })
        }

        fn set_user_proxy(&mut self, _proxy: UserProxy) {}

        fn submit(&mut self) -> ExecFuture<'_, JobHandle> {
            let tag = self.0;
            Box::pin(async move { Ok(format!("{tag}--x")) })
        }
    }

    fn ctx() -> ExecutorContext {
        ExecutorContext {
            input: GaswInput::new("echo"),
            reporter: CompletionReporter::new(Arc::new(Shared::default())),
        }
    }

    #[tokio::test]
    async fn local_target_is_reached_from_any_version() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ExecutorRegistry::new().with_local(dir.path());

        for version in ["LOCAL", "GRID", "OTHER"] {
            let target = ExecutionTarget::new(version, TARGET_LOCAL);
            assert!(registry.executor(&target, ctx()).is_ok(), "{target}");
        }

        let miss = registry.executor(&ExecutionTarget::new("GRID", "DIRAC"), ctx());
        assert!(matches!(miss, Err(GaswError::UnknownExecutor { .. })));
    }

    #[tokio::test]
    async fn exact_registration_wins_over_any_version() {
        let exact_calls = Arc::new(AtomicUsize::new(0));
        let calls = Arc::clone(&exact_calls);
        let registry = ExecutorRegistry::new()
            .with_any_version("X", |_| Ok(Box::new(Tagged("any")) as Box<dyn Executor>))
            .with(ExecutionTarget::new("GRID", "X"), move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(Tagged("exact")) as Box<dyn Executor>)
            });

        let mut exact = registry
            .executor(&ExecutionTarget::new("GRID", "X"), ctx())
            .unwrap();
        assert_eq!(exact.submit().await.unwrap(), "exact--x");

        let mut any = registry
            .executor(&ExecutionTarget::new("LOCAL", "X"), ctx())
            .unwrap();
        assert_eq!(any.submit().await.unwrap(), "any--x");
        assert_eq!(exact_calls.load(Ordering::SeqCst), 1);
    }
}
