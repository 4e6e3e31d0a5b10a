//! Configuration loading and types for fakegcs.
//!
//! Configuration is read from a YAML file and deserialized into the
//! [`Config`] struct. Every section has defaults, so an empty file (or no
//! file at all) yields a usable in-memory emulator.

use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bucket backend settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Buckets to create before the listener starts.
    #[serde(default)]
    pub buckets: Vec<String>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which [`crate::backend::store::BucketBackend`] to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Buckets live in memory and vanish on exit.
    #[default]
    Memory,
    /// Buckets are directories under `backend.root_dir`.
    Local,
}

/// Bucket backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Backend type: `memory` or `local`.
    #[serde(default)]
    pub kind: BackendKind,

    /// Root directory for the `local` backend.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            root_dir: default_root_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: text or json.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { metrics: true }
    }
}

// -- Defaults ----------------------------------------------------------------

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4443
}

fn default_root_dir() -> String {
    "./data/buckets".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// -- Loader ------------------------------------------------------------------

/// Parse configuration from YAML text.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    // serde_yaml rejects an empty document; treat it as all defaults.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(contents)?;
    Ok(config)
}

/// Load and parse configuration from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4443);
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert!(config.buckets.is_empty());
        assert!(config.observability.metrics);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 9000
backend:
  kind: local
  root_dir: /tmp/fakegcs
buckets:
  - photos
  - logs
logging:
  level: debug
  format: json
observability:
  metrics: false
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.backend.kind, BackendKind::Local);
        assert_eq!(config.backend.root_dir, "/tmp/fakegcs");
        assert_eq!(config.buckets, vec!["photos", "logs"]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert!(!config.observability.metrics);
    }

    #[test]
    fn test_unknown_backend_kind_is_rejected() {
        assert!(parse_config("backend:\n  kind: sqlite\n").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "buckets: [seeded]\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.buckets, vec!["seeded"]);
    }
}
