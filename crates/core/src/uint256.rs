use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a 256-bit unsigned integer, used for block and root hashes.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UInt256 {
    data: [u64; 4],
}

impl UInt256 {
    /// The length of UInt256 values in bytes.
    pub const LENGTH: usize = 32;

    /// Represents 0.
    pub const ZERO: Self = Self { data: [0; 4] };

    /// Creates a new UInt256 from a byte slice.
    ///
    /// # Panics
    ///
    /// Panics if the slice length is not equal to `LENGTH`.
    pub fn new(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), Self::LENGTH, "Invalid byte length for UInt256");
        let mut data = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            data[i] = u64::from_le_bytes(word);
        }
        Self { data }
    }

    /// Fallible construction from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseUInt256Error> {
        if bytes.len() != Self::LENGTH {
            return Err(ParseUInt256Error::InvalidLength);
        }
        Ok(Self::new(bytes))
    }

    /// Returns 0.
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Checks whether this value is 0.
    pub fn is_zero(&self) -> bool {
        self.data == [0u64; 4]
    }

    /// Converts the UInt256 to a byte array.
    pub fn to_array(&self) -> [u8; Self::LENGTH] {
        let mut result = [0u8; Self::LENGTH];
        for (i, &value) in self.data.iter().enumerate() {
            result[i * 8..(i + 1) * 8].copy_from_slice(&value.to_le_bytes());
        }
        result
    }
}

impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_array().iter().rev().copied().collect::<Vec<u8>>()))
    }
}

impl fmt::Debug for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt256({})", self)
    }
}

impl FromStr for UInt256 {
    type Err = ParseUInt256Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != Self::LENGTH * 2 {
            return Err(ParseUInt256Error::InvalidLength);
        }
        let mut bytes = hex::decode(s).map_err(|_| ParseUInt256Error::InvalidHex)?;
        bytes.reverse();
        Ok(Self::new(&bytes))
    }
}

/// Errors raised when parsing a UInt256 from text or bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseUInt256Error {
    /// Input was not exactly 32 bytes (64 hex characters).
    #[error("invalid UInt256 length")]
    InvalidLength,

    /// Input contained non-hexadecimal characters.
    #[error("invalid hexadecimal string")]
    InvalidHex,
}
