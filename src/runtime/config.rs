//! Host configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Port variable the platform sets for custom handler processes.
pub const PORT_ENV: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";
/// Optional bind host override.
pub const HOST_ENV: &str = "TRIGGER_FNS_HOST";

/// Configuration for the host server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Environment variables exposed to every function.
    pub env: HashMap<String, String>,
    /// Whether to serve `/_health`.
    pub enable_health: bool,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            env: HashMap::new(),
            enable_health: true,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(PORT_ENV) {
            config.port = raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_ENV,
                value: raw.clone(),
            })?;
        }

        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        Ok(config)
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Add an environment variable for functions.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort { var: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort { var, value } => {
                write!(f, "{} is not a valid port: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_without_environment() {
        let config = HostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.enable_health);
    }

    #[test]
    fn port_and_host_from_environment() {
        let vars = [(PORT_ENV, "7071"), (HOST_ENV, "0.0.0.0")];
        let config = HostConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:7071");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let vars = [(PORT_ENV, "http")];
        let err = HostConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                var: PORT_ENV,
                value: "http".to_string()
            }
        );
    }

    #[test]
    fn builder_overrides() {
        let config = HostConfig::new()
            .host("localhost")
            .port(9000)
            .env("STAGE", "test")
            .max_body_size(16);
        assert_eq!(config.bind_addr(), "localhost:9000");
        assert_eq!(config.env.get("STAGE"), Some(&"test".to_string()));
        assert_eq!(config.max_body_size, 16);
    }
}
