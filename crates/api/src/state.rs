use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::{JobDriver, JobRegistry};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Every job submitted since startup.
    pub registry: Arc<JobRegistry>,
    /// Launches and tracks per-job timelines.
    pub driver: Arc<JobDriver>,
}

impl AppState {
    /// Build a state with a fresh, empty registry and a driver using the
    /// configured timeline.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let driver = Arc::new(JobDriver::new(Arc::clone(&registry), config.timeline));
        Self {
            config: Arc::new(config),
            registry,
            driver,
        }
    }
}
