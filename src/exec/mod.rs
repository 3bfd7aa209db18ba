// src/exec/mod.rs

//! Executor backends.
//!
//! - [`backend`] defines the `Executor` trait, the `ExecutorSelector` seam
//!   the coordinator uses to pick one per `(version, target)`, and the
//!   `ExecutorRegistry` implementation of it.
//! - [`local`] is the local backend: it runs the job's command line with
//!   `tokio::process` and reports the completion back to the coordinator.

pub mod backend;
pub mod local;

pub use backend::{ExecFuture, Executor, ExecutorContext, ExecutorRegistry, ExecutorSelector};
pub use local::LocalExecutor;
