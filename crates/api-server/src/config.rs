//! Process configuration
//!
//! Everything the server needs from the environment: where the task store
//! lives and which port to listen on. Loaded once at startup.

use std::path::PathBuf;

use thiserror::Error;

/// Default port when `PORT` is unset
const DEFAULT_PORT: u16 = 5000;

/// Default store location when `TASKS_DATA_DIR` is unset
const DEFAULT_DATA_DIR: &str = ".tasklist-data";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Server configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding the task document file
    pub data_dir: PathBuf,
    /// Port the HTTP server listens on
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `TASKS_DATA_DIR` (default `.tasklist-data`) and `PORT`
    /// (default 5000). A `.env` file is honored when present. A `PORT`
    /// that is set but not a number is a fatal configuration error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present; ignore a missing file
        dotenvy::dotenv().ok();

        let data_dir = std::env::var("TASKS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("expected a port number, got '{}'", raw),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self { data_dir, port })
    }
}
