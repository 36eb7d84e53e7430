//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, a `.env` file, or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Endpoints and timeout of the three backend services.
    pub backends: BackendsConfig,

    /// Session store retention.
    pub session: SessionConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Backend service endpoints.
///
/// Each URL is a base URL; the client appends its contracted path
/// (`/messages`, `/sparql`, `/format-results`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    /// Natural-language-to-SPARQL translator.
    pub translator_url: String,

    /// Triple store accepting SPARQL queries.
    pub graph_query_url: String,

    /// Result formatter.
    pub formatter_url: String,

    /// Timeout applied to every single backend round trip, in seconds.
    pub timeout_secs: u64,
}

/// Session retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sessions unused for longer than this are eligible for purge.
    pub idle_timeout_secs: u64,

    /// How often the background purge runs.
    pub sweep_interval_secs: u64,
}

impl BackendsConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            translator_url: "http://127.0.0.1:8000".to_string(),
            graph_query_url: "http://127.0.0.1:7200".to_string(),
            formatter_url: "http://127.0.0.1:8001".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 24 * 60 * 60,
            sweep_interval_secs: 300,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "sparql-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            backends: BackendsConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    /// Environment variables are expected to be prefixed with `MCP_`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_current_env()
    }

    /// Load configuration from the given `.env` file, then the environment.
    ///
    /// Variables already set in the process environment take precedence
    /// over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> crate::core::Result<Self> {
        dotenvy::from_path(path.as_ref()).map_err(|e| {
            crate::core::Error::config(format!(
                "failed to load {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self::from_current_env())
    }

    fn from_current_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(url) = std::env::var("MCP_TRANSLATOR_URL") {
            config.backends.translator_url = url;
        }
        if let Ok(url) = std::env::var("MCP_GRAPH_QUERY_URL") {
            config.backends.graph_query_url = url;
        }
        if let Ok(url) = std::env::var("MCP_FORMATTER_URL") {
            config.backends.formatter_url = url;
        }
        config.backends.timeout_secs =
            env_number("MCP_BACKEND_TIMEOUT_SECS", config.backends.timeout_secs);

        config.session.idle_timeout_secs =
            env_number("MCP_SESSION_IDLE_SECS", config.session.idle_timeout_secs);
        config.session.sweep_interval_secs =
            env_number("MCP_SESSION_SWEEP_SECS", config.session.sweep_interval_secs);

        config
    }
}

/// Read a numeric variable, falling back to `default` when unset or invalid.
pub(crate) fn env_number<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
