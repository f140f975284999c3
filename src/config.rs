//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::ServiceError;

/// Service name used when `APP_NAME` is unset.
pub const DEFAULT_APP_NAME: &str = "item-registry";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Service ===
    /// Service name, shown in logs and the API docs.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    // === Server Configuration ===
    /// Address to bind the HTTP server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Observability ===
    /// Log filter (trace, debug, info, warn, error, or directives).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit one JSON object per log line.
    #[serde(default = "default_true")]
    pub log_json: bool,

    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            host: default_host(),
            port: default_port(),
            rust_log: default_log_level(),
            log_json: default_true(),
            metrics_enabled: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, ServiceError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.app_name.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "APP_NAME must not be empty".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(ServiceError::InvalidConfig(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        if self.host.parse::<IpAddr>().is_err() {
            return Err(ServiceError::InvalidConfig(format!(
                "HOST must be an IP address, got {:?}",
                self.host
            )));
        }

        if EnvFilter::try_new(&self.rust_log).is_err() {
            return Err(ServiceError::InvalidConfig(format!(
                "RUST_LOG is not a valid filter: {:?}",
                self.rust_log
            )));
        }

        Ok(())
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ServiceError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ServiceError::InvalidConfig(format!("HOST must be an IP address, got {:?}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
