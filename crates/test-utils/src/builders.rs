#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gasw::config::GaswConfig;
use gasw::coordinator::{Coordinator, CoordinatorBuilder};
use gasw::monitor::MonitorRegistry;
use gasw::persistence::MemoryPersistence;
use gasw::resolve::{OutputResolver, ResolverRegistry};
use gasw::types::{ExecutionTarget, Family};

use crate::fake_backends::{FakeMonitor, RecordingResolver, ResolveCall};
use crate::fake_executor::{ExecutorLog, FakeSelector};

pub const LOCAL_START_TIME: i64 = 100;
pub const GRID_START_TIME: i64 = 200;

/// Notifier interval used by fixtures unless overridden.
pub const FAST_INTERVAL: Duration = Duration::from_millis(25);

/// Builder for a coordinator wired to fakes for every collaborator.
pub struct FixtureBuilder {
    config: GaswConfig,
    target: Option<ExecutionTarget>,
    selector: FakeSelector,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self {
            config: GaswConfig::default().with_notification_interval(FAST_INTERVAL),
            target: None,
            selector: FakeSelector::new(),
        }
    }

    pub fn target(mut self, target: ExecutionTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn selector(mut self, selector: FakeSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn notification_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_notification_interval(interval);
        self
    }

    /// Coordinator builder plus the handles the fixture keeps on its fakes.
    pub fn into_parts(self) -> (CoordinatorBuilder, Fixtures) {
        let local_monitor = Arc::new(FakeMonitor::new(LOCAL_START_TIME));
        let grid_monitor = Arc::new(FakeMonitor::new(GRID_START_TIME));
        let persistence = Arc::new(MemoryPersistence::new());
        let resolve_calls = Arc::new(Mutex::new(Vec::new()));
        let failing = Arc::new(Mutex::new(HashSet::new()));

        let monitors = MonitorRegistry::new()
            .with(Family::Local, local_monitor.clone())
            .with(Family::Grid, grid_monitor.clone());

        let mut resolvers = ResolverRegistry::new();
        for family in [Family::Local, Family::Grid] {
            let calls = Arc::clone(&resolve_calls);
            let failing = Arc::clone(&failing);
            resolvers = resolvers.with(family, move |start_time| {
                Box::new(RecordingResolver {
                    family,
                    start_time,
                    calls: Arc::clone(&calls),
                    failing: Arc::clone(&failing),
                }) as Box<dyn OutputResolver>
            });
        }

        let mut builder = Coordinator::builder(self.config)
            .executors(Arc::new(self.selector.clone()))
            .monitors(monitors)
            .resolvers(resolvers)
            .persistence(persistence.clone());
        if let Some(target) = self.target {
            builder = builder.target(target);
        }

        let fixtures = Fixtures {
            executor_log: self.selector.log(),
            resolve_calls,
            failing,
            local_monitor,
            grid_monitor,
            persistence,
        };
        (builder, fixtures)
    }

    pub fn build(self) -> Fixture {
        let (builder, fakes) = self.into_parts();
        let coordinator = builder.build().expect("Failed to build coordinator from fixture");
        Fixture { coordinator, fakes }
    }
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles on the fakes behind a fixture coordinator.
pub struct Fixtures {
    pub executor_log: Arc<Mutex<ExecutorLog>>,
    pub resolve_calls: Arc<Mutex<Vec<ResolveCall>>>,
    pub failing: Arc<Mutex<HashSet<String>>>,
    pub local_monitor: Arc<FakeMonitor>,
    pub grid_monitor: Arc<FakeMonitor>,
    pub persistence: Arc<MemoryPersistence>,
}

pub struct Fixture {
    pub coordinator: Coordinator,
    pub fakes: Fixtures,
}

impl Fixture {
    pub fn fail_resolution_of(&self, job_id: &str) {
        self.fakes.failing.lock().unwrap().insert(job_id.to_string());
    }

    pub fn allow_resolution_of(&self, job_id: &str) {
        self.fakes.failing.lock().unwrap().remove(job_id);
    }

    pub fn executor_log(&self) -> ExecutorLog {
        self.fakes.executor_log.lock().unwrap().clone()
    }

    pub fn resolve_calls(&self) -> Vec<ResolveCall> {
        self.fakes.resolve_calls.lock().unwrap().clone()
    }
}
