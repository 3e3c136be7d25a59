// Configuration module entry point
// Loads layered configuration and exposes the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::Path;

// Re-export public types
pub use state::AppState;
pub use types::{AssetsConfig, Config, HttpConfig, PerformanceConfig};

/// Environment variable prefix, e.g. `SEHATECH_SERVER__PORT=8080`
const ENV_PREFIX: &str = "SEHATECH";

/// `SEHATECH_*` variables; nested keys use `__`, origin lists use commas
fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("http.allowed_origins")
        .try_parsing(true)
}

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Layers: built-in defaults, then the file if present, then environment.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_layered(config_path, env_source())
    }

    fn load_layered(
        config_path: &str,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env)
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would only fail later at bind or request time
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.port == 0 {
            return Err(config::ConfigError::Message(
                "server.port must be non-zero".to_string(),
            ));
        }

        let index = Path::new(&self.assets.index_file);
        if self.assets.index_file.is_empty() || index.file_name() != Some(index.as_os_str()) {
            return Err(config::ConfigError::Message(format!(
                "assets.index_file must be a bare file name, got '{}'",
                self.assets.index_file
            )));
        }

        if self.logging.access_log_format.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "logging.access_log_format must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
