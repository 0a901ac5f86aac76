//! Raw disk store capabilities.
//!
//! The cache only needs two things from the store it persists records into:
//! point lookups and point writes. Both are modeled as narrow traits so the
//! cache never depends on a concrete storage engine.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CacheError, CacheResult};

/// Read capability of the raw disk store.
pub trait Store {
    /// Looks up a raw key. `Ok(None)` means the key does not exist; I/O
    /// failures are reported as errors and never swallowed.
    fn get(&self, key: &[u8]) -> CacheResult<Option<Vec<u8>>>;
}

/// Write capability of the raw disk store, handed to the cache at commit
/// time.
pub trait StoreWriter {
    /// Writes a raw key/value pair.
    fn put(&mut self, key: &[u8], value: Vec<u8>) -> CacheResult<()>;
}

/// In-memory store implementation for testing and bulk imports.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of raw keys held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }
}

impl StoreWriter for MemoryStore {
    fn put(&mut self, key: &[u8], value: Vec<u8>) -> CacheResult<()> {
        self.data.insert(key.to_vec(), value);
        Ok(())
    }
}

// Shared-store plumbing: a locked store can be read by the cache while the
// same handle serves as the commit writer.
impl<S: Store> Store for Arc<RwLock<S>> {
    fn get(&self, key: &[u8]) -> CacheResult<Option<Vec<u8>>> {
        self.read()
            .map_err(|_| CacheError::store("store lock poisoned"))?
            .get(key)
    }
}

impl<S: StoreWriter> StoreWriter for Arc<RwLock<S>> {
    fn put(&mut self, key: &[u8], value: Vec<u8>) -> CacheResult<()> {
        self.write()
            .map_err(|_| CacheError::store("store lock poisoned"))?
            .put(key, value)
    }
}
