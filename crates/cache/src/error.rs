//! Error types for the direct cache.
//!
//! Besides the error enum itself, this module centralizes the downgrade
//! classification: some failures are never propagated to callers but are
//! mapped to a defined fallback value instead. A record that fails to decode
//! is served as a cache miss, and a state node that was pruned away is
//! recorded as an absent value during commit. Keeping that mapping in one
//! place makes it possible to test it exhaustively.

use thiserror::Error;

/// Result alias used throughout the cache crate.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors raised by the direct cache and its collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The authoritative structure no longer holds the node backing a key,
    /// typically because the key was deleted and the node pruned.
    #[error("missing state node for key {key}")]
    NodeMissing {
        /// Hex rendering of the affected logical key.
        key: String,
    },

    /// A persisted cache record could not be decoded.
    #[error("record decode failed: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// A cache record could not be encoded for persistence.
    #[error("record encode failed: {message}")]
    Encode {
        /// Description of the encode failure.
        message: String,
    },

    /// The raw disk store failed.
    #[error("store error: {message}")]
    Store {
        /// Description of the store failure.
        message: String,
    },

    /// The authoritative structure failed for any other reason.
    #[error("state error: {message}")]
    State {
        /// Description of the state failure.
        message: String,
    },
}

impl CacheError {
    /// Builds a `NodeMissing` error for the given logical key.
    pub fn node_missing(key: &[u8]) -> Self {
        CacheError::NodeMissing {
            key: hex::encode(key),
        }
    }

    /// Builds a `Decode` error.
    pub fn decode(message: impl Into<String>) -> Self {
        CacheError::Decode {
            message: message.into(),
        }
    }

    /// Builds an `Encode` error.
    pub fn encode(message: impl Into<String>) -> Self {
        CacheError::Encode {
            message: message.into(),
        }
    }

    /// Builds a `Store` error.
    pub fn store(message: impl Into<String>) -> Self {
        CacheError::Store {
            message: message.into(),
        }
    }

    /// Builds a `State` error.
    pub fn state(message: impl Into<String>) -> Self {
        CacheError::State {
            message: message.into(),
        }
    }

    /// Downgrade classification applied on the read path.
    ///
    /// Only decode failures are softened there: the record on disk is
    /// unusable, so the read falls through to the authoritative structure as
    /// a plain cache miss. Every other error propagates unchanged.
    pub fn read_fallback(&self) -> Option<Fallback> {
        match self {
            CacheError::Decode { .. } => Some(Fallback::Miss),
            _ => None,
        }
    }

    /// Downgrade classification applied to the per-key re-read during commit.
    ///
    /// A missing state node means the key was deleted and pruned, so the
    /// commit records an absence instead of aborting. Every other error
    /// aborts the commit.
    pub fn commit_fallback(&self) -> Option<Fallback> {
        match self {
            CacheError::NodeMissing { .. } => Some(Fallback::Absent),
            _ => None,
        }
    }
}

/// Value substituted for an error that the cache downgrades instead of
/// propagating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Serve the read as a cache miss and fall through to the state map.
    Miss,
    /// Record the key as holding no value.
    Absent,
}
