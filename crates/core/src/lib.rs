//! Core primitive types shared across the Veritrie crates.
//!
//! This crate carries the fixed-size hash type used to identify blocks and
//! trie roots. It deliberately has no knowledge of tries, caches or stores.

pub mod uint256;

pub use uint256::{ParseUInt256Error, UInt256};

/// Size of a 256-bit hash in bytes.
pub const HASH_SIZE: usize = 32;
