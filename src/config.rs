//! Configuration management.
//!
//! Loads configuration from environment variables (optionally seeded from a
//! `.env` file by the binary) with sensible defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listen address (`HOST`, default `0.0.0.0`).
    pub host: IpAddr,
    /// Listen port (`PORT`, default 3000).
    pub port: u16,
    /// Database connection string (`MONGO_URI`). When unset the server still
    /// starts, and every store operation reports the missing setting.
    pub database_url: Option<String>,
    /// Database name override (`MONGO_DB`).
    pub database_name: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = match get("HOST") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key: "HOST", value: v })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: v })?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host,
            port,
            database_url: get("MONGO_URI"),
            database_name: get("MONGO_DB"),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
