// File-backed store
// Keeps the whole map in memory and rewrites the TOML file on every put

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::{KvStore, StoreError};
use crate::logger;

/// On-disk layout of the store file
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
struct StoreFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Store persisted to a single TOML file
pub struct FileStore {
    path: PathBuf,
    contents: RwLock<StoreFile>,
}

impl FileStore {
    /// Open the store at `path`
    ///
    /// A missing file starts an empty store. A file that exists but cannot be
    /// read or parsed is an error, so a corrupt file is never overwritten.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let parsed: StoreFile = toml::from_str(&raw)?;
                logger::log_info(&format!(
                    "[Store] Loaded {} entries from {}",
                    parsed.entries.len(),
                    path.display()
                ));
                parsed
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                logger::log_info(&format!(
                    "[Store] {} not found, starting empty",
                    path.display()
                ));
                StoreFile::default()
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            contents: RwLock::new(contents),
        })
    }

    async fn save(&self, contents: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let serialized = toml::to_string_pretty(contents)?;
        tokio::fs::write(&self.path, serialized).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.contents.read().await.entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Hold the write lock across the file write so the file never
        // reflects an older map than a concurrent writer's.
        let mut contents = self.contents.write().await;
        let previous = contents.entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.save(&contents).await {
            match previous {
                Some(old) => contents.entries.insert(key.to_string(), old),
                None => contents.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
