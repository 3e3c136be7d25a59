// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: None,
        }
    }
}

/// Bundled frontend assets
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AssetsConfig {
    /// Asset root directory; empty means unconfigured
    pub root: String,
    /// Entry document served for unmatched paths
    pub index_file: String,
    /// Plain-text body when neither a file nor the index document exists
    pub banner: String,
}

impl AssetsConfig {
    pub fn root_dir(&self) -> Option<&Path> {
        if self.root.trim().is_empty() {
            None
        } else {
            Some(Path::new(&self.root))
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "static".to_string(),
            index_file: "index.html".to_string(),
            banner: "SehaTech Simple Backend API is running! 🚀".to_string(),
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    /// Origins allowed for cross-origin requests, `*` allows any
    pub allowed_origins: Vec<String>,
    pub max_body_size: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: concat!("SehaTech-Backend/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_cors: true,
            allowed_origins: vec!["*".to_string()],
            max_body_size: 10_485_760, // 10MB
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    pub error_log_file: Option<String>,
}

impl LoggingConfig {
    pub fn debug_enabled(&self) -> bool {
        self.level.eq_ignore_ascii_case("debug")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            show_headers: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration (all durations in seconds)
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Grace period for in-flight connections after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
            shutdown_timeout: 10,
        }
    }
}
