// src/monitor.rs

//! Per-family job monitors.
//!
//! The coordinator only needs two things from a monitor: the reference start
//! time handed to output resolvers, and a way to stop it on shutdown.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::errors::{GaswError, Result};
use crate::types::Family;

pub trait Monitor: Send + Sync + fmt::Debug {
    /// Reference start time (unix seconds).
    fn start_time(&self) -> i64;

    /// Stop monitoring. Called once per coordinator shutdown.
    fn terminate(&self);
}

/// Monitors keyed by infrastructure family.
#[derive(Debug, Clone, Default)]
pub struct MonitorRegistry {
    monitors: HashMap<Family, Arc<dyn Monitor>>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `monitor` for `family`, replacing any previous one.
    pub fn with(mut self, family: Family, monitor: Arc<dyn Monitor>) -> Self {
        self.monitors.insert(family, monitor);
        self
    }

    pub fn monitor(&self, family: Family) -> Result<Arc<dyn Monitor>> {
        self.monitors
            .get(&family)
            .cloned()
            .ok_or(GaswError::UnknownFamily {
                kind: "monitor",
                family,
            })
    }

    pub fn terminate_all(&self) {
        for (family, monitor) in &self.monitors {
            debug!(%family, "terminating monitor");
            monitor.terminate();
        }
    }
}

/// Monitor of the local family: records when it was created.
#[derive(Debug)]
pub struct LocalMonitor {
    start_time: i64,
    terminated: AtomicBool,
}

impl LocalMonitor {
    pub fn new() -> Self {
        let start_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::with_start_time(start_time)
    }

    pub fn with_start_time(start_time: i64) -> Self {
        Self {
            start_time,
            terminated: AtomicBool::new(false),
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

impl Default for LocalMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor for LocalMonitor {
    fn start_time(&self) -> i64 {
        self.start_time
    }

    fn terminate(&self) {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            info!("local monitor terminated");
        }
    }
}
