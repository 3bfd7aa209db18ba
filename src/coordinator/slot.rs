// src/coordinator/slot.rs

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::coordinator::{Coordinator, CoordinatorBuilder};
use crate::errors::Result;

/// Holder for the process's coordinator.
///
/// **First call wins**: the first successful `get_or_*` builds the
/// coordinator; every later call returns that same instance and silently
/// ignores its own builder, including a different default target. A failed
/// build leaves the slot empty so a later call may try again.
#[derive(Debug, Default)]
pub struct CoordinatorSlot {
    inner: Mutex<Option<Arc<Coordinator>>>,
}

impl CoordinatorSlot {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Return the coordinator, building it with `init` if the slot is empty.
    ///
    /// Concurrent callers serialize here, so `init` runs at most once per
    /// successful initialisation.
    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<Coordinator>>
    where
        F: FnOnce() -> Result<Coordinator>,
    {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = guard.as_ref() {
            debug!("coordinator already initialised; ignoring new arguments");
            return Ok(existing.clone());
        }

        let coordinator = Arc::new(init()?);
        *guard = Some(coordinator.clone());
        Ok(coordinator)
    }

    pub fn get_or_build(&self, builder: CoordinatorBuilder) -> Result<Arc<Coordinator>> {
        self.get_or_init(|| builder.build())
    }

    pub fn get(&self) -> Option<Arc<Coordinator>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
