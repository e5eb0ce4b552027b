//! Token service configuration.
//!
//! Configuration is loaded once from environment variables at startup and
//! never changes afterwards. The app certificate is redacted in Debug output.

use rtc_token::APP_ID_LENGTH;
use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default graceful shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Token service configuration.
#[derive(Clone)]
pub struct Config {
    /// Public identifier of the tenant application (`agora.app_id`).
    pub app_id: String,

    /// Signing secret (`agora.app_certificate`). Never logged or returned.
    pub app_certificate: SecretString,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Seconds to keep serving after a shutdown signal (default: 0).
    pub drain_seconds: u64,

    /// Log output format (default: text).
    pub log_format: LogFormat,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("drain_seconds", &self.drain_seconds)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid app id: {0}")]
    InvalidAppId(String),

    #[error("Invalid app certificate: {0}")]
    InvalidAppCertificate(String),

    #[error("Invalid drain period: {0}")]
    InvalidDrainSeconds(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let app_id = vars
            .get("AGORA_APP_ID")
            .ok_or_else(|| ConfigError::MissingEnvVar("AGORA_APP_ID".to_string()))?
            .trim()
            .to_string();

        if app_id.len() != APP_ID_LENGTH || !app_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidAppId(format!(
                "AGORA_APP_ID must be {} alphanumeric characters, got {} characters",
                APP_ID_LENGTH,
                app_id.len()
            )));
        }

        let app_certificate = vars
            .get("AGORA_APP_CERTIFICATE")
            .ok_or_else(|| ConfigError::MissingEnvVar("AGORA_APP_CERTIFICATE".to_string()))?
            .trim();

        if app_certificate.is_empty() {
            return Err(ConfigError::InvalidAppCertificate(
                "AGORA_APP_CERTIFICATE must not be empty".to_string(),
            ));
        }
        let app_certificate = SecretString::from(app_certificate);

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let drain_seconds = match vars.get("DRAIN_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => DEFAULT_DRAIN_SECONDS,
        };

        let log_format = match vars.get("LOG_FORMAT").map(|s| s.to_ascii_lowercase()) {
            None => LogFormat::default(),
            Some(s) if s == "text" => LogFormat::Text,
            Some(s) if s == "json" => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidLogFormat(format!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        };

        Ok(Config {
            app_id,
            app_certificate,
            bind_address,
            drain_seconds,
            log_format,
        })
    }
}
