//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables, following the conventions of the original
//! deployment: `LIONGARD_*` for credentials, `MCP_*` for server behavior,
//! and `AUTH_MODE` for single-tenant vs. gateway operation.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Liongard API credentials (single-tenant mode).
    pub credentials: CredentialsConfig,

    /// How credentials are supplied: process environment or per-request
    /// headers.
    pub auth_mode: AuthMode,
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

/// Liongard credential configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Liongard API key (`LIONGARD_API_KEY`).
    pub api_key: Option<String>,

    /// Liongard instance subdomain (`LIONGARD_INSTANCE`).
    pub instance: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("instance", &self.instance)
            .finish()
    }
}

/// Credential supply mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Credentials come from the process environment at startup.
    #[default]
    Env,

    /// Credentials arrive per request via custom headers (multi-tenant).
    Gateway,
}

impl AuthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::Env => "env",
            AuthMode::Gateway => "gateway",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "liongard-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            auth_mode: AuthMode::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        config.credentials.api_key = std::env::var("LIONGARD_API_KEY")
            .ok()
            .filter(|v| !v.is_empty());
        config.credentials.instance = std::env::var("LIONGARD_INSTANCE")
            .ok()
            .filter(|v| !v.is_empty());

        config.auth_mode = match std::env::var("AUTH_MODE").as_deref() {
            Ok("gateway") => AuthMode::Gateway,
            _ => AuthMode::Env,
        };

        match config.auth_mode {
            AuthMode::Gateway => {
                info!("Gateway mode: credentials are taken from request headers");
            }
            AuthMode::Env => {
                if config.credentials.api_key.is_none() || config.credentials.instance.is_none() {
                    warn!(
                        "LIONGARD_API_KEY and/or LIONGARD_INSTANCE not set - tool calls will \
                         fail until both are provided"
                    );
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_credentials_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("LIONGARD_API_KEY", "test_key_12345");
            std::env::set_var("LIONGARD_INSTANCE", "test-instance");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.api_key.as_deref(),
            Some("test_key_12345")
        );
        assert_eq!(
            config.credentials.instance.as_deref(),
            Some("test-instance")
        );
        unsafe {
            std::env::remove_var("LIONGARD_API_KEY");
            std::env::remove_var("LIONGARD_INSTANCE");
        }
    }

    #[test]
    fn test_credentials_absent_by_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("LIONGARD_API_KEY");
            std::env::remove_var("LIONGARD_INSTANCE");
        }
        let config = Config::from_env();
        assert!(config.credentials.api_key.is_none());
        assert!(config.credentials.instance.is_none());
    }

    #[test]
    fn test_auth_mode_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("AUTH_MODE", "gateway");
        }
        let config = Config::from_env();
        assert_eq!(config.auth_mode, AuthMode::Gateway);
        unsafe {
            std::env::remove_var("AUTH_MODE");
        }
        let config = Config::from_env();
        assert_eq!(config.auth_mode, AuthMode::Env);
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            api_key: Some("super_secret_key".to_string()),
            instance: Some("acme".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }
}
