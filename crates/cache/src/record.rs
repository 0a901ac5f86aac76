//! The persisted cache record format.

use serde::{Deserialize, Serialize};
use veritrie_core::UInt256;

use crate::error::{CacheError, CacheResult};

/// A cached value together with the block it was derived from.
///
/// A record is only meaningful relative to its `(origin_number, origin_hash)`
/// pair: readers must check that pair against the canonical chain before
/// trusting `value`. Records are always overwritten wholesale, never patched
/// in place, and a deleted logical key simply has no record at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The cached payload. `None` records a confirmed absence, written when
    /// the key was deleted from the authoritative structure.
    pub value: Option<Vec<u8>>,
    /// Height of the block whose state produced this value.
    pub origin_number: u64,
    /// Hash of that block.
    pub origin_hash: UInt256,
}

impl CacheRecord {
    /// Creates a new record.
    pub fn new(value: Option<Vec<u8>>, origin_number: u64, origin_hash: UInt256) -> Self {
        Self {
            value,
            origin_number,
            origin_hash,
        }
    }

    /// Encodes the record for persistence.
    ///
    /// The encoding is an internal contract between writer and reader, with
    /// no compatibility promise towards any external format.
    pub fn to_bytes(&self) -> CacheResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| CacheError::encode(e.to_string()))
    }

    /// Decodes a persisted record.
    pub fn from_bytes(bytes: &[u8]) -> CacheResult<Self> {
        if bytes.is_empty() {
            return Err(CacheError::decode("empty record"));
        }
        bincode::deserialize(bytes).map_err(|e| CacheError::decode(e.to_string()))
    }
}
