use shared_config::AppConfig;

use crate::session::SessionStore;

/// Shared application state threaded through every router.
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
        }
    }
}
