use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::{ClinicStore, InMemoryStore};

/// Shared handles every cell router is built with.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ClinicStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ClinicStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(InMemoryStore::new()))
    }
}
