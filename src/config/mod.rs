//! Configuration management for fetchsum
//!
//! Settings are layered from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use fetchsum::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Max parallel requests: {}", config.dispatch.max_parallel);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `FETCHSUM__<section>__<key>`:
//! - `FETCHSUM__HTTP__REQUEST_TIMEOUT_MS=10000`
//! - `FETCHSUM__FETCH__CHUNK_SIZE=64KB`
//! - `FETCHSUM__DISPATCH__MAX_PARALLEL=32`
//!
//! # Configuration File
//!
//! By default the file is read from `config/fetchsum.toml` when present.
//! `FETCHSUM_CONFIG` or the `--config` flag point elsewhere.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, DispatchSettings, FetchSettings, HttpSettings};
pub use validation::ValidationError;

use sources::EnvSource;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + `.env` + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layered(sources::default_path(), false, EnvSource::Process)
    }

    /// Load configuration from an explicit file, which must exist.
    /// `.env` and environment overrides still apply on top of it.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        Self::load_layered(path, true, EnvSource::Process)
    }

    fn load_layered(
        path: PathBuf,
        required: bool,
        env_source: EnvSource,
    ) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path, required, env_source)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
