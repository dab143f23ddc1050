//! Server Configuration
//!
//! Defaults, overridable from the environment:
//! - `VIZ_HOST` / `VIZ_PORT`: listen address
//! - `VIZ_WORKSPACE_ROOT`: directory holding workspace snapshots
//! - `VIZ_CACHE_CAPACITY`: number of open workspaces kept
//! - `VIZ_LOG_FORMAT`: `text` or `json`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::DEFAULT_CACHE_CAPACITY;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_WORKSPACE_ROOT: &str = "./workspaces";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line, level included, for log collectors
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workspace_root: PathBuf,
    pub cache_capacity: usize,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE_ROOT),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("VIZ_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: std::env::var("VIZ_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            workspace_root: std::env::var("VIZ_WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORKSPACE_ROOT)),
            cache_capacity: std::env::var("VIZ_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
            log_format: std::env::var("VIZ_LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Address to bind, `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
