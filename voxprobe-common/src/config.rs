//! Bootstrap configuration loading
//!
//! Resolution priority for every setting (highest first):
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is never fatal: the service logs a warning and starts
//! on compiled defaults. A TOML file that exists but cannot be parsed is a
//! configuration error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the API secret (preferred name)
pub const API_KEY_ENV: &str = "VOXPROBE_API_KEY";

/// Environment variable holding the API secret (name used by existing deployments)
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";

/// Compiled-in defaults used when no other source provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub bind_address: String,
    pub log_level: String,
    pub api_key: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9000".to_string(),
            log_level: "info".to_string(),
            // Development key; a warning is logged whenever it is in effect
            api_key: "myhackathonkey123".to_string(),
        }
    }
}

/// Logging configuration (`[logging]` table)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// EnvFilter directive (trace, debug, info, warn, error, or per-target list).
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    CompiledDefaults::default().log_level
}

/// Locates a module's TOML config file
pub struct ConfigFileResolver {
    module_name: String,
}

impl ConfigFileResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    /// Platform config path for this module: `<config_dir>/voxprobe/<module>.toml`
    pub fn default_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("voxprobe").join(format!("{}.toml", self.module_name)))
    }

    /// Resolve the config file to load
    ///
    /// An explicit path (CLI or ENV) must exist. The platform default is used
    /// only when present; otherwise `Ok(None)`.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }

        Ok(self.default_path().filter(|p| p.exists()))
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load a TOML config if one was resolved, else fall back to defaults
///
/// Silent: this runs before tracing is installed, so the caller reports
/// which source was used.
pub fn load_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => load_toml_config(path),
        None => Ok(T::default()),
    }
}

/// Where the effective API secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Environment,
    LegacyEnvironment,
    Toml,
    CompiledDefault,
}

/// Resolved API secret
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    pub value: String,
    pub source: SecretSource,
}

impl std::fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the API secret from ENV → TOML → compiled default
///
/// `VOXPROBE_API_KEY` wins over `API_KEY`. Blank values are ignored.
pub fn resolve_api_key(toml_key: Option<&str>) -> ResolvedSecret {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| is_valid_key(k));
    let legacy_env_key = std::env::var(LEGACY_API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_key.filter(|k| is_valid_key(k)).map(str::to_string);

    let configured = [env_key.is_some(), legacy_env_key.is_some(), toml_key.is_some()]
        .iter()
        .filter(|present| **present)
        .count();
    if configured > 1 {
        warn!("API key found in multiple sources; using highest priority (ENV over TOML)");
    }

    let resolved = if let Some(value) = env_key {
        ResolvedSecret {
            value,
            source: SecretSource::Environment,
        }
    } else if let Some(value) = legacy_env_key {
        ResolvedSecret {
            value,
            source: SecretSource::LegacyEnvironment,
        }
    } else if let Some(value) = toml_key {
        ResolvedSecret {
            value,
            source: SecretSource::Toml,
        }
    } else {
        warn!("No API key configured; falling back to the compiled development key");
        ResolvedSecret {
            value: CompiledDefaults::default().api_key,
            source: SecretSource::CompiledDefault,
        }
    };

    info!(source = ?resolved.source, "API key resolved");
    resolved
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
