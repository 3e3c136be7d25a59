// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::data::DataProvider;

/// Application state
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn DataProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn DataProvider>) -> Self {
        Self { config, provider }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
