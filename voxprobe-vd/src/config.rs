//! Configuration resolution for voxprobe-vd
//!
//! Priority: CLI → ENV → TOML (`voxprobe-vd.toml`) → compiled defaults.
//! The resolved [`ServiceConfig`] is validated once at startup; nothing is
//! re-read while the service runs.

use serde::Deserialize;
use std::net::SocketAddr;
use tracing::info;
use voxprobe_common::config::{resolve_api_key, CompiledDefaults, LoggingConfig, ResolvedSecret};
use voxprobe_common::{Error, Result};

use crate::analysis::PitchConfig;
use crate::services::ClassifierParams;

/// Module name used for the config file lookup
pub const MODULE_NAME: &str = "voxprobe-vd";

/// Default request body ceiling (25 MiB, enough for a few minutes of base64 MP3)
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Contents of `voxprobe-vd.toml`; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub api_key: Option<String>,
    pub max_body_bytes: Option<usize>,
    pub legacy_root_route: Option<bool>,
    pub logging: LoggingConfig,
    pub detection: ClassifierParams,
    pub pitch: PitchConfig,
}

/// HTTP gateway switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayOptions {
    pub max_body_bytes: usize,
    /// Serve the tester-compatible `POST /` alias
    pub legacy_root_route: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            legacy_root_route: true,
        }
    }
}

/// Fully resolved service configuration
///
/// `[logging]` is consumed before resolution, when tracing is installed.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: SocketAddr,
    pub api_key: ResolvedSecret,
    pub gateway: GatewayOptions,
    pub detection: ClassifierParams,
    pub pitch: PitchConfig,
}

impl ServiceConfig {
    /// Merge CLI/ENV overrides over the TOML file and validate the result
    pub fn resolve(cli_bind: Option<&str>, toml: TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let bind = cli_bind
            .map(str::to_string)
            .or(toml.bind_address)
            .unwrap_or(defaults.bind_address);
        let bind_address: SocketAddr = bind
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

        let gateway = GatewayOptions {
            max_body_bytes: toml.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES),
            legacy_root_route: toml.legacy_root_route.unwrap_or(true),
        };
        if gateway.max_body_bytes == 0 {
            return Err(Error::Config("max_body_bytes must be positive".to_string()));
        }

        toml.detection.validate()?;
        toml.pitch
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        let api_key = resolve_api_key(toml.api_key.as_deref());

        info!(
            bind = %bind_address,
            max_body_bytes = gateway.max_body_bytes,
            legacy_root_route = gateway.legacy_root_route,
            "Configuration resolved"
        );

        Ok(Self {
            bind_address,
            api_key,
            gateway,
            detection: toml.detection,
            pitch: toml.pitch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let toml: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(toml.detection, ClassifierParams::default());
        assert_eq!(toml.pitch, PitchConfig::default());
        assert_eq!(toml.logging, LoggingConfig::default());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let toml: TomlConfig = toml::from_str(
            r#"
            legacy_root_route = false

            [detection]
            ai_confidence = 0.75

            [pitch]
            fmax_hz = 400.0
            "#,
        )
        .unwrap();

        assert_eq!(toml.legacy_root_route, Some(false));
        assert_eq!(toml.detection.ai_confidence, 0.75);
        assert_eq!(toml.detection.pitch_variation_threshold, 10.0);
        assert_eq!(toml.pitch.fmax_hz, 400.0);
        assert_eq!(toml.pitch.fmin_hz, 50.0);
    }

    #[test]
    fn test_cli_bind_overrides_toml() {
        let toml = TomlConfig {
            bind_address: Some("127.0.0.1:7000".to_string()),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(Some("0.0.0.0:8000"), toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000".parse().unwrap());
    }

    #[test]
    fn test_default_bind_address() {
        let config = ServiceConfig::resolve(None, TomlConfig::default()).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.gateway, GatewayOptions::default());
    }

    #[test]
    fn test_invalid_bind_address_rejected() {
        let result = ServiceConfig::resolve(Some("not-an-address"), TomlConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let toml = TomlConfig {
            detection: ClassifierParams {
                human_confidence: -0.1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ServiceConfig::resolve(None, toml).is_err());
    }

    #[test]
    fn test_invalid_pitch_band_rejected() {
        let toml = TomlConfig {
            pitch: PitchConfig {
                fmin_hz: 400.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ServiceConfig::resolve(None, toml).is_err());
    }
}
