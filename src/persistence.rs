// src/persistence.rs

//! Persistence hook. The coordinator only ever closes it on shutdown.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::errors::{GaswError, Result};

pub trait Persistence: Send + Sync + Debug {
    fn close(&self) -> Result<()>;
}

/// Persistence with nothing to flush; closing twice is an error.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    closed: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Persistence for MemoryPersistence {
    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(GaswError::Persistence("already closed".to_string()));
        }
        info!("persistence closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_close_is_rejected() {
        let p = MemoryPersistence::new();
        p.close().unwrap();
        assert!(p.is_closed());
        assert!(matches!(p.close(), Err(GaswError::Persistence(_))));
    }
}
