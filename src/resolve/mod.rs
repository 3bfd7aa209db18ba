// src/resolve/mod.rs

//! Output resolvers: turn a completion token into a [`GaswOutput`].
//!
//! Resolvers are registered per family as factories taking the family
//! monitor's start time, so a fresh resolver is built for every drained
//! entry.

pub mod local;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{GaswError, Result};
use crate::job::{CompletionToken, GaswOutput};
use crate::types::Family;

pub use local::LocalOutputResolver;

pub trait OutputResolver: Send {
    fn resolve(&self, job_id: &str, token: &CompletionToken) -> Result<GaswOutput>;
}

/// Builds a resolver for a given monitor start time.
pub type ResolverFactory = Arc<dyn Fn(i64) -> Box<dyn OutputResolver> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ResolverRegistry {
    factories: HashMap<Family, ResolverFactory>,
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("families", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, family: Family, factory: F) -> Self
    where
        F: Fn(i64) -> Box<dyn OutputResolver> + Send + Sync + 'static,
    {
        self.factories.insert(family, Arc::new(factory));
        self
    }

    pub fn resolver(&self, family: Family, start_time: i64) -> Result<Box<dyn OutputResolver>> {
        let factory = self.factories.get(&family).ok_or(GaswError::UnknownFamily {
            kind: "output resolver",
            family,
        })?;
        Ok(factory(start_time))
    }
}
