use super::models::Config;
use config::{ConfigError, Environment, File, Map};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "FETCHSUM_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/fetchsum.toml";
const ENV_PREFIX: &str = "FETCHSUM";
const ENV_SEPARATOR: &str = "__";

/// Variables to read `FETCHSUM__*` overrides from
#[derive(Debug, Clone)]
pub enum EnvSource {
    /// Process environment, after loading `.env` via dotenvy
    Process,
    /// Fixed map, process environment untouched
    Map(Map<String, String>),
}

/// Config file location from `FETCHSUM_CONFIG`, else the default path
pub fn default_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists, or always when `required`)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
///
/// With `required` set, a missing file is an error instead of being skipped.
pub fn load_from_sources(
    config_path: PathBuf,
    required: bool,
    env_source: EnvSource,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() || required {
        tracing::debug!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(required));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // FETCHSUM__DISPATCH__MAX_PARALLEL -> dispatch.max_parallel
    let environment = Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true);
    let environment = match env_source {
        EnvSource::Process => {
            // A missing .env file is fine
            let _ = dotenvy::dotenv();
            environment
        }
        EnvSource::Map(vars) => environment.source(Some(vars)),
    };

    builder.add_source(environment).build()?.try_deserialize()
}
