// Store doubles shared by unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Barrier;

use super::{KvStore, MemoryStore, StoreError};

/// Wraps a [`MemoryStore`] and counts calls
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: MemoryStore::with_entries(entries),
            ..Self::default()
        }
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.gets() + self.puts()
    }
}

#[async_trait]
impl KvStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value).await
    }
}

/// Which operations of a [`FailingStore`] fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Get,
    Put,
}

/// Store whose selected operation always fails
pub struct FailingStore {
    fail_on: FailOn,
    inner: RecordingStore,
}

impl FailingStore {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            fail_on,
            inner: RecordingStore::new(),
        }
    }

    pub fn puts(&self) -> usize {
        self.inner.puts()
    }

    fn failure() -> StoreError {
        StoreError::Unavailable("connection refused by 10.0.0.7:6379".to_string())
    }
}

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_on == FailOn::Get {
            return Err(Self::failure());
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_on == FailOn::Put {
            return Err(Self::failure());
        }
        self.inner.put(key, value).await
    }
}

/// Store whose first `readers` reads wait until all of them are in flight
///
/// Forces concurrent read-modify-write sequences to interleave. Later reads
/// pass straight through.
pub struct GatedStore {
    inner: MemoryStore,
    gate: Arc<Barrier>,
    readers: usize,
    reads: AtomicUsize,
}

impl GatedStore {
    pub fn new(readers: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            gate: Arc::new(Barrier::new(readers)),
            readers,
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl KvStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.inner.get(key).await?;
        if self.reads.fetch_add(1, Ordering::SeqCst) < self.readers {
            self.gate.wait().await;
        }
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.put(key, value).await
    }
}
