use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Host the analysis pipeline listens on.
    pub server_host: String,
    /// Port of the pipeline's WebSocket endpoint.
    pub server_port: u16,
    pub log_level: Level,
    /// Directory for durable client state (the session identity file).
    pub state_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let server_host =
            std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port_str =
            std::env::var("SERVER_PORT").unwrap_or_else(|_| "8000".to_string());
        let server_port = server_port_str.parse::<u16>().map_err(|e| {
            ConfigError::InvalidValue("SERVER_PORT".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let state_dir = match std::env::var("STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::home_dir()
                .ok_or_else(|| ConfigError::MissingVar("HOME".to_string()))?
                .join(".claimlens"),
        };

        Ok(Self {
            server_host,
            server_port,
            log_level,
            state_dir,
        })
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server_host = host;
        }
        if let Some(port) = port {
            self.server_port = port;
        }
        self
    }
}
