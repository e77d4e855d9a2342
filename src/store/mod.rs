//! Key-value store module
//!
//! The counter logic only ever talks to a [`KvStore`]: an asynchronous
//! string get/put capability. Backends:
//! - `memory` - process-local map, lost on restart
//! - `file` - same map, persisted to a TOML file on every write

mod file;
mod memory;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize store contents: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to parse store file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key-value capability.
///
/// `put` overwrites unconditionally; there is no compare-and-swap.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Shared handle injected into request handling
pub type SharedStore = Arc<dyn KvStore>;

/// Open the backend selected in configuration
pub async fn open_store(config: &StoreConfig) -> Result<SharedStore, StoreError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::File => {
            let store = FileStore::open(&config.path).await?;
            Ok(Arc::new(store))
        }
    }
}
