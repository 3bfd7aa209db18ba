// src/coordinator/mod.rs

//! The job coordinator.
//!
//! A [`Coordinator`] owns:
//! - the finished-job set, the draining flag and the registered client,
//!   all behind one lock ([`state`]);
//! - the completion notifier task ([`notifier`]);
//! - its collaborators: executor selector, monitors, output resolvers and
//!   the persistence hook.
//!
//! One coordinator per process is a caller convention; [`CoordinatorSlot`]
//! gives the "first call builds, later calls reuse" behaviour.

pub mod client;
pub mod notifier;
pub mod slot;
pub mod state;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::config::GaswConfig;
use crate::errors::{GaswError, Result, SubmissionStage};
use crate::exec::{ExecutorContext, ExecutorRegistry, ExecutorSelector};
use crate::job::{CompletionToken, GaswInput, GaswOutput, JobHandle, family_of, job_id_of};
use crate::logging;
use crate::monitor::{LocalMonitor, MonitorRegistry};
use crate::persistence::{MemoryPersistence, Persistence};
use crate::proxy::{GridUserCredentials, MyproxyServer, ProxyConfiguration, VomsServer};
use crate::resolve::{LocalOutputResolver, OutputResolver, ResolverRegistry};
use crate::types::{ExecutionTarget, Family};

pub use client::GaswClient;
pub use slot::CoordinatorSlot;
pub use state::CompletionReporter;

use notifier::{NotifierHandle, spawn_notifier};
use state::Shared;

/// Target a submission of `input` goes to, given the coordinator default.
///
/// A SYSTEM `gridTarget` entry replaces the target name; the version is
/// always the default one.
pub fn resolve_target(default: &ExecutionTarget, input: &GaswInput) -> ExecutionTarget {
    match input.target_override() {
        Some(target) => default.with_target(target),
        None => default.clone(),
    }
}

pub struct Coordinator {
    default_target: ExecutionTarget,
    shared: Arc<Shared>,
    executors: Arc<dyn ExecutorSelector>,
    monitors: MonitorRegistry,
    resolvers: ResolverRegistry,
    persistence: Arc<dyn Persistence>,
    proxy_config: ProxyConfiguration,
    notifier: Mutex<Option<NotifierHandle>>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("default_target", &self.default_target)
            .field("monitors", &self.monitors)
            .field("resolvers", &self.resolvers)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn builder(config: GaswConfig) -> CoordinatorBuilder {
        CoordinatorBuilder::new(config)
    }

    pub fn default_target(&self) -> &ExecutionTarget {
        &self.default_target
    }

    /// Handle backends use to report finished jobs.
    pub fn reporter(&self) -> CompletionReporter {
        CompletionReporter::new(self.shared.clone())
    }

    pub fn resolve_target(&self, input: &GaswInput) -> ExecutionTarget {
        resolve_target(&self.default_target, input)
    }

    /// Submit a job without credentials.
    pub async fn submit(&self, client: &GaswClient, input: GaswInput) -> Result<JobHandle> {
        self.submit_inner(client, input, None).await
    }

    /// Submit a job, attaching a delegated proxy built from `credentials`.
    ///
    /// Servers left as `None` fall back to the `[proxy]` configuration.
    pub async fn submit_with_credentials(
        &self,
        client: &GaswClient,
        input: GaswInput,
        credentials: GridUserCredentials,
        myproxy: Option<MyproxyServer>,
        voms: Option<VomsServer>,
    ) -> Result<JobHandle> {
        self.submit_inner(client, input, Some((credentials, myproxy, voms)))
            .await
    }

    async fn submit_inner(
        &self,
        client: &GaswClient,
        input: GaswInput,
        credentials: Option<(GridUserCredentials, Option<MyproxyServer>, Option<VomsServer>)>,
    ) -> Result<JobHandle> {
        self.register_client(client);

        let target = self.resolve_target(&input);
        debug!(exec_target = %target, executable = %input.executable, "selecting executor");

        let ctx = ExecutorContext {
            input,
            reporter: self.reporter(),
        };
        let mut executor = self
            .executors
            .executor(&target, ctx)
            .map_err(|e| GaswError::submission(SubmissionStage::ExecutorSelection, e))?;

        executor
            .pre_process()
            .await
            .map_err(|e| GaswError::submission(SubmissionStage::PreProcess, e))?;

        if let Some((credentials, myproxy, voms)) = credentials {
            let proxy = self.proxy_config.delegate(credentials, myproxy, voms);
            debug!(delegation = ?proxy.delegation, myproxy = %proxy.myproxy.host, "attaching user proxy");
            executor.set_user_proxy(proxy);
        }

        let handle = executor
            .submit()
            .await
            .map_err(|e| GaswError::submission(SubmissionStage::Submit, e))?;

        info!(handle = %handle, exec_target = %target, "job submitted");
        Ok(handle)
    }

    /// The first client ever registered stays the only one.
    fn register_client(&self, client: &GaswClient) {
        if self.shared.client.set(client.clone()).is_ok() {
            debug!("client registered");
            return;
        }
        if let Some(existing) = self.shared.client.get() {
            if !existing.is_same(client) {
                warn!("a different client is already registered; it keeps receiving notifications");
            }
        }
    }

    /// Merge completions reported by a backend.
    ///
    /// A handle already pending is overwritten by the new token.
    pub fn add_finished_job(&self, mapping: HashMap<JobHandle, CompletionToken>) {
        self.shared.merge(mapping);
    }

    /// Resolve and remove every pending finished job.
    ///
    /// Marks the coordinator as draining, which suppresses notifications
    /// until [`Coordinator::wait_for_notification`] is called. If any entry
    /// fails to resolve, the error is returned and no entry is removed.
    /// Output order is unspecified.
    pub fn get_finished_jobs(&self) -> Result<Vec<GaswOutput>> {
        let mut state = self.shared.lock();
        state.draining = true;

        let mut outputs = Vec::with_capacity(state.finished.len());
        for (handle, token) in state.finished.iter() {
            match self.resolve_entry(handle, token) {
                Ok(output) => outputs.push(output),
                Err(err) => {
                    warn!(
                        handle = %handle,
                        error = %err,
                        pending = state.finished.len(),
                        "failed to resolve finished job; leaving all entries for the next drain"
                    );
                    return Err(err);
                }
            }
        }

        state.finished.clear();
        if !outputs.is_empty() {
            info!(drained = outputs.len(), "drained finished jobs");
        }
        Ok(outputs)
    }

    fn resolve_entry(&self, handle: &str, token: &CompletionToken) -> Result<GaswOutput> {
        let family = family_of(handle);
        let start_time = self.monitors.monitor(family)?.start_time();
        let resolver: Box<dyn OutputResolver> = self.resolvers.resolver(family, start_time)?;
        resolver.resolve(job_id_of(handle), token)
    }

    /// Clear the draining flag so the notifier may wake the client again.
    pub fn wait_for_notification(&self) {
        self.shared.lock().draining = false;
    }

    pub fn is_draining(&self) -> bool {
        self.shared.lock().draining
    }

    /// Number of finished jobs waiting to be drained.
    pub fn pending_count(&self) -> usize {
        self.shared.lock().finished.len()
    }

    /// Stop monitors and the notifier, then close persistence.
    ///
    /// Safe to call more than once; only the first call does anything. No
    /// wake-up is sent once this has started.
    pub async fn terminate(&self) -> Result<()> {
        {
            let mut state = self.shared.lock();
            if state.terminated {
                debug!("coordinator already terminated");
                return Ok(());
            }
            state.terminated = true;
        }

        self.monitors.terminate_all();

        let notifier = self
            .notifier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut notifier) = notifier {
            notifier.stop().await;
        }

        self.persistence.close().inspect_err(|err| {
            error!(error = %err, "failed to close persistence");
        })?;

        info!("coordinator terminated");
        Ok(())
    }
}

/// Builds a [`Coordinator`].
///
/// Unset collaborators default to the local family only: the local executor
/// for target `LOCAL` under any version, a [`LocalMonitor`], a
/// [`LocalOutputResolver`] and [`MemoryPersistence`].
pub struct CoordinatorBuilder {
    config: GaswConfig,
    target: Option<ExecutionTarget>,
    executors: Option<Arc<dyn ExecutorSelector>>,
    monitors: Option<MonitorRegistry>,
    resolvers: Option<ResolverRegistry>,
    persistence: Option<Arc<dyn Persistence>>,
    runtime: Option<Handle>,
}

impl fmt::Debug for CoordinatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorBuilder")
            .field("config", &self.config)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl CoordinatorBuilder {
    pub fn new(config: GaswConfig) -> Self {
        Self {
            config,
            target: None,
            executors: None,
            monitors: None,
            resolvers: None,
            persistence: None,
            runtime: None,
        }
    }

    /// Default `(version, target)`; overrides the configured one.
    pub fn target(mut self, target: ExecutionTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn executors(mut self, executors: Arc<dyn ExecutorSelector>) -> Self {
        self.executors = Some(executors);
        self
    }

    pub fn monitors(mut self, monitors: MonitorRegistry) -> Self {
        self.monitors = Some(monitors);
        self
    }

    pub fn resolvers(mut self, resolvers: ResolverRegistry) -> Self {
        self.resolvers = Some(resolvers);
        self
    }

    pub fn persistence(mut self, persistence: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Runtime hosting the notifier. Defaults to the current one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Set up logging and proxy configuration, then start the notifier.
    pub fn build(self) -> Result<Coordinator> {
        logging::init_logging(None, self.config.logging.level.as_deref());

        let proxy_config = ProxyConfiguration::init(&self.config.proxy)?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| {
                GaswError::Configuration(format!(
                    "no Tokio runtime available for the completion notifier: {e}"
                ))
            })?,
        };

        let default_target = self
            .target
            .unwrap_or_else(|| self.config.default_target().clone());

        let executors = self.executors.unwrap_or_else(|| {
            Arc::new(ExecutorRegistry::new().with_local(self.config.local.output_dir.clone()))
        });
        let monitors = self.monitors.unwrap_or_else(|| {
            MonitorRegistry::new().with(Family::Local, Arc::new(LocalMonitor::new()))
        });
        let resolvers = self.resolvers.unwrap_or_else(|| {
            ResolverRegistry::new().with(Family::Local, |start_time| {
                Box::new(LocalOutputResolver::new(start_time)) as Box<dyn OutputResolver>
            })
        });
        let persistence = self
            .persistence
            .unwrap_or_else(|| Arc::new(MemoryPersistence::new()));

        let shared = Arc::new(Shared::default());
        let notifier = spawn_notifier(
            &runtime,
            shared.clone(),
            self.config.notification_interval(),
        );

        info!(
            default_target = %default_target,
            interval = ?self.config.notification_interval(),
            "coordinator started"
        );

        Ok(Coordinator {
            default_target,
            shared,
            executors,
            monitors,
            resolvers,
            persistence,
            proxy_config,
            notifier: Mutex::new(Some(notifier)),
        })
    }
}
