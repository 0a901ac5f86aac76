//! Authoritative state capability.
//!
//! The direct cache never owns state itself; everything grounds out in a
//! versioned key/value structure, typically a state trie. That structure is
//! consumed through the [`StateMap`] trait so the cache stays independent of
//! any concrete trie implementation.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use veritrie_core::UInt256;

use crate::error::CacheResult;
use crate::store::StoreWriter;

/// The authoritative, versioned key/value structure the cache fronts.
///
/// Values returned here are always correct; the cache only shortcuts reads,
/// it never overrides them.
pub trait StateMap {
    /// Reads the current value of a logical key.
    ///
    /// `Ok(None)` means the key is absent. `Err(CacheError::NodeMissing)`
    /// means the node backing the key was pruned away; other errors are
    /// genuine failures.
    fn try_get(&self, key: &[u8]) -> CacheResult<Option<Vec<u8>>>;

    /// Writes a logical key.
    fn try_update(&mut self, key: &[u8], value: Vec<u8>) -> CacheResult<()>;

    /// Deletes a logical key.
    fn try_delete(&mut self, key: &[u8]) -> CacheResult<()>;

    /// Commits pending changes through `writer` and returns the new root
    /// hash.
    fn commit_to(&mut self, writer: &mut dyn StoreWriter) -> CacheResult<UInt256>;

    /// Iterates all current key/value pairs.
    fn iter(&self) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>;
}

/// In-memory [`StateMap`] for tests and for embedding without a real trie.
///
/// The root is a digest over the sorted entries, so equal content yields an
/// equal root. Nothing is persisted through the commit writer; all state
/// stays resident.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateMap {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStateMap {
    /// Creates an empty state map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of logical keys held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks whether the map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn root(&self) -> UInt256 {
        let mut hasher = Sha256::new();
        for (key, value) in &self.data {
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value);
        }
        UInt256::new(hasher.finalize().as_slice())
    }
}

impl StateMap for MemoryStateMap {
    fn try_get(&self, key: &[u8]) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn try_update(&mut self, key: &[u8], value: Vec<u8>) -> CacheResult<()> {
        self.data.insert(key.to_vec(), value);
        Ok(())
    }

    fn try_delete(&mut self, key: &[u8]) -> CacheResult<()> {
        self.data.remove(key);
        Ok(())
    }

    fn commit_to(&mut self, _writer: &mut dyn StoreWriter) -> CacheResult<UInt256> {
        Ok(self.root())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_> {
        Box::new(self.data.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}
