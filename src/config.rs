/// Configuration Module
///
/// Provides configuration management for the CHM6 board management CLI.
/// Handles loading and parsing of the YAML configuration file and
/// environment variable overrides.

use config::{Config as ConfigFile, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application metadata configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct Application {
    /// Name of the application
    pub name: String,
}

/// gRPC client transport configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GrpcClientConfig {
    /// Endpoint URI of the management service, scheme and host only
    /// (e.g. "http://127.0.0.1")
    pub endpoint: String,
    /// Service port
    pub port: u16,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl GrpcClientConfig {
    /// Full endpoint URI including the port.
    pub fn uri(&self) -> String {
        format!("{}:{}", self.endpoint, self.port)
    }
}

/// gRPC configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct GrpcConfig {
    /// Client transport configuration
    pub client: GrpcClientConfig,
}

/// Application configuration settings
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Application metadata
    pub application: Application,
    /// gRPC configuration
    pub grpc: GrpcConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl Settings {
    /// Loads settings from the given YAML file, then applies environment
    /// variable overrides.
    ///
    /// # Configuration Sources
    /// Configuration is loaded in the following order (later sources
    /// override earlier ones):
    /// 1. The YAML file at `path`
    /// 2. Environment variables prefixed with `CHM6_`, nested keys
    ///    separated by `__` (e.g. `CHM6_GRPC__CLIENT__PORT=50052`)
    ///
    /// # Errors
    /// Returns a `ConfigError` if the file cannot be read or a value
    /// cannot be parsed into the expected shape.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let builder = ConfigFile::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("CHM6")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
