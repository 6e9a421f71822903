#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for streamsx
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/streamsx/config.toml)
//! - Environment variables
//! - CLI flags
//!
//! It is the only place that reads the process environment; everything below
//! it receives explicit values.

mod service;

pub use service::ServiceConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use streamsx_errors::{ConfigError, Error};
use streamsx_net::NetConfig;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub poll: PollConfig,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
}

/// How the CLI waits for a build to settle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval")]
    pub interval: u64, // seconds
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_timeout() -> u64 {
    300 // archive uploads can be slow
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    120
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("streamsx").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.service.merge_env();

        // STREAMSX_TIMEOUT
        if let Ok(timeout) = std::env::var("STREAMSX_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "STREAMSX_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        // STREAMSX_POLL_INTERVAL
        if let Ok(interval) = std::env::var("STREAMSX_POLL_INTERVAL") {
            self.poll.interval = interval.parse().map_err(|_| ConfigError::InvalidValue {
                field: "STREAMSX_POLL_INTERVAL".to_string(),
                value: interval,
            })?;
        }

        Ok(())
    }

    /// Transport settings for the network client
    #[must_use]
    pub fn net_config(&self) -> NetConfig {
        NetConfig {
            timeout: Duration::from_secs(self.network.timeout),
            connect_timeout: Duration::from_secs(self.network.connect_timeout),
            ..NetConfig::default()
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval)
    }
}
