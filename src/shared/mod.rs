//! Shared newtypes and utilities used across all modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format clients and the node send, so they can be used directly in wire
//! types without conversion overhead.

pub mod codes;
pub mod serde_util;

pub use codes::ReturnCode;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::CodecError;

// ─── Address ─────────────────────────────────────────────────────────────────

/// A 20-byte ledger account or contract address.
///
/// Serializes as a `0x`-prefixed lowercase hex string. Leading zero bytes are
/// part of the address and are never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Take the trailing 20 bytes of a 32-byte Keccak digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..]);
        Self(out)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = parse_hex_bytes(s)?;
        if bytes.len() != Self::LEN {
            return Err(CodecError::InvalidHex {
                value: s.to_string(),
            });
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ─── TxHash ──────────────────────────────────────────────────────────────────

/// Transaction hash as reported by the node (`0x`-prefixed hex).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(to_hex_prefixed(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for TxHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TxHash(s))
    }
}

// ─── Utilities ───────────────────────────────────────────────────────────────

/// Decode a hex string with or without the `0x` prefix. `""` and `"0x"` decode to
/// an empty vector; an odd digit count is left-padded with a zero nibble.
pub fn parse_hex_bytes(value: &str) -> Result<Vec<u8>, CodecError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    };
    decoded.map_err(|_| CodecError::InvalidHex {
        value: trimmed.to_string(),
    })
}

pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a node quantity (`"0x1a"`) into a `u64`.
pub fn parse_hex_u64(value: &str) -> Result<u64, CodecError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(|_| CodecError::InvalidInteger {
        value: trimmed.to_string(),
    })
}
