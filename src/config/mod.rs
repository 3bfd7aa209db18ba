// src/config/mod.rs

//! Global configuration for gasw.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file (or a job file) from disk (`loader.rs`).
//! - Validate the raw model into a [`GaswConfig`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_jobs, load_or_default};
pub use model::{
    CoreSection, DEFAULT_NOTIFICATION_INTERVAL, GaswConfig, LocalSection, LoggingSection,
    MAX_NOTIFICATION_INTERVAL, ProxySection, RawGaswConfig,
};
pub use validate::parse_duration;
