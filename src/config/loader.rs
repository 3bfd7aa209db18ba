// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{GaswConfig, RawGaswConfig};
use crate::errors::Result;
use crate::job::{GaswInput, JobFile};

/// Load a configuration file from a given path and return the raw
/// `RawGaswConfig`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// a usable [`GaswConfig`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGaswConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawGaswConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GaswConfig> {
    let raw_config = load_from_path(&path)?;
    let config = GaswConfig::try_from(raw_config)?;
    Ok(config)
}

/// Like [`load_and_validate`], but a missing file yields the defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<GaswConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "config file not found; using defaults");
        return Ok(GaswConfig::default());
    }
    load_and_validate(path)
}

/// Load the `[[job]]` list of a job file.
pub fn load_jobs(path: impl AsRef<Path>) -> Result<Vec<GaswInput>> {
    let contents = fs::read_to_string(path.as_ref())?;
    let file: JobFile = toml::from_str(&contents)?;
    Ok(file.job)
}

/// Default config location: `gasw.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("gasw.toml")
}
