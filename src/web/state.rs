//! Shared state for the form handlers.

use crate::config::toml_config::DashboardConfig;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub config: DashboardConfig,
    pub monitor: bool,
    /// Held for the whole browser walk; a second campaign request waits here.
    pub scrape_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: DashboardConfig, monitor: bool) -> Self {
        Self {
            config,
            monitor,
            scrape_lock: Mutex::new(()),
        }
    }
}

pub type SharedState = Arc<AppState>;
