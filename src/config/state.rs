// Application state module
// Holds the loaded configuration and the injected store handle

use super::types::Config;
use crate::store::SharedStore;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(config: &Config, store: SharedStore) -> Self {
        Self {
            config: config.clone(),
            store,
        }
    }
}
