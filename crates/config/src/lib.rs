//! Host configuration.
//! A required file (TOML, JSON, YAML, ... by extension) overlaid with `TRELLIS__` environment
//! variables, where `__` separates nesting levels (`TRELLIS__SERVER__PORT` → `server.port`).
//!
//! ```rust,ignore
//! use trellis_config::{AppConfig, load_config};
//!
//! let config: AppConfig = load_config(Some("server.toml"))?;
//! println!("listening on {}", config.server.socket_addr());
//! ```
mod settings;

pub use settings::{AppConfig, AppConfigInner, LoggingConfig, ScanConfig, ServerConfig};

use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_PREFIX: &str = "TRELLIS";
pub const DEFAULT_PATH: &str = "server";

#[trellis_derive::trellis_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a configuration file and `TRELLIS__` environment overrides.
///
/// Without a path, `server` in the working directory is used (any supported extension).
///
/// # Errors
/// Returns [`ConfigError`] when the file is missing or unreadable, or when the merged values
/// do not deserialize into `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// Same as [`load_config`], reading overrides from `env` instead of the process environment.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T, I>(path: Option<impl AsRef<Path>>, env: I) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (String, String)>,
{
    load_layered(path, Some(env.into_iter().collect()))
}

fn load_layered<T>(path: Option<impl AsRef<Path>>, env: Option<Map<String, String>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from(DEFAULT_PATH), |p| p.as_ref().to_path_buf());

    let builder = Config::builder().add_source(File::from(effective_path.as_path()).required(true)).add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .convert_case(config::Case::Snake)
            .source(env),
    );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
