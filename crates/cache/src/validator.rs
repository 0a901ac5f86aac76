//! Canonical-chain oracle.

use std::collections::HashMap;
use std::sync::RwLock;

use veritrie_core::UInt256;

/// Checks whether a certain block is in the current canonical chain.
///
/// This is the only question the cache ever asks about the chain, so the
/// capability is kept to a single method and implementations stay decoupled
/// from any concrete chain.
pub trait CacheValidator: Send + Sync {
    /// Returns true if block `number` with hash `hash` is canonical.
    fn is_canonical(&self, number: u64, hash: &UInt256) -> bool;
}

/// Validator used when no chain context is available.
///
/// It answers false for every block, so no persisted record is ever trusted
/// and the cache degrades to a pure write-tracking passthrough over the
/// authoritative structure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCacheValidator;

impl CacheValidator for NullCacheValidator {
    fn is_canonical(&self, _number: u64, _hash: &UInt256) -> bool {
        false
    }
}

/// Validator backed by a height-to-hash index of the canonical chain.
///
/// The index is updated as headers are imported and truncated on reorgs, so
/// a record minted on a side chain stops validating as soon as its origin
/// block leaves the index.
#[derive(Debug, Default)]
pub struct HeaderIndexValidator {
    headers: RwLock<HashMap<u64, UInt256>>,
}

impl HeaderIndexValidator {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `hash` as the canonical block at `number`, replacing any
    /// previous entry for that height.
    pub fn insert(&self, number: u64, hash: UInt256) {
        if let Ok(mut headers) = self.headers.write() {
            headers.insert(number, hash);
        }
    }

    /// Drops every height strictly above `number`, as happens when the chain
    /// reorganizes back to that block.
    pub fn rollback_to(&self, number: u64) {
        if let Ok(mut headers) = self.headers.write() {
            headers.retain(|&height, _| height <= number);
        }
    }
}

impl CacheValidator for HeaderIndexValidator {
    fn is_canonical(&self, number: u64, hash: &UInt256) -> bool {
        match self.headers.read() {
            Ok(headers) => headers.get(&number) == Some(hash),
            Err(_) => false,
        }
    }
}
