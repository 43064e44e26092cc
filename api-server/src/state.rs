//! Application state for the API server.

use std::sync::Arc;

use common::config::AppConfig;

use crate::db::ConnectionMonitor;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub monitor: Arc<ConnectionMonitor>,
}

impl AppState {
    /// Creates a new application state with a disconnected monitor.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            monitor: Arc::new(ConnectionMonitor::new()),
        }
    }
}
