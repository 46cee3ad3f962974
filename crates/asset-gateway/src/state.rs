//! Application state

use crate::config::GatewayConfig;
use asset_store::{FsObjectStore, MemoryObjectStore, ObjectStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Object store backend
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Create state with the store selected by the configuration:
    /// filesystem when a data directory is set, in-memory otherwise.
    pub fn new(config: GatewayConfig) -> Self {
        let store: Arc<dyn ObjectStore> = match &config.data_dir {
            Some(dir) => {
                info!(data_dir = %dir.display(), "using filesystem object store");
                Arc::new(FsObjectStore::new(dir.clone()))
            }
            None => {
                warn!("using in-memory object store - data will NOT persist");
                Arc::new(MemoryObjectStore::new())
            }
        };

        Self { config, store }
    }

    /// Create state around an explicit store. Used by tests to inject
    /// fakes.
    pub fn with_store(config: GatewayConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }
}
