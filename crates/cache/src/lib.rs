//! Validity-aware direct state cache.
//!
//! This crate sits in front of an authoritative, versioned key/value
//! structure (typically a state trie) and a raw disk store. Values derived
//! from the trie are persisted flat under a configurable key prefix, so
//! later reads can skip re-deriving them, but a persisted entry is only
//! trusted when the block it originated from is still part of the canonical
//! chain at read time.
//!
//! The central type is [`DirectCache`], which tracks dirty keys, decides per
//! read whether a persisted record is trustworthy, and re-persists every
//! dirty key with block provenance at commit time. The collaborators it
//! needs are expressed as narrow traits: [`StateMap`] for the authoritative
//! structure, [`Store`]/[`StoreWriter`] for the disk store and
//! [`CacheValidator`] for the canonical-chain oracle.

pub mod cache;
pub mod error;
pub mod metrics;
pub mod record;
pub mod state;
pub mod store;
pub mod validator;

// Re-export main types
pub use cache::{read_direct_record, write_direct_record, DirectCache};
pub use error::{CacheError, CacheResult, Fallback};
pub use metrics::CacheMetrics;
pub use record::CacheRecord;
pub use state::{MemoryStateMap, StateMap};
pub use store::{MemoryStore, Store, StoreWriter};
pub use validator::{CacheValidator, HeaderIndexValidator, NullCacheValidator};
