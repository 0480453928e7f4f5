//! Deterministic 32-byte salt derivation.
//!
//! The salt is mixed into the factory's CREATE2 address derivation, so the
//! same inputs must always produce the same bytes:
//!
//! | input                         | salt                                   |
//! |-------------------------------|----------------------------------------|
//! | `"0x" + 64 hex chars`         | the value itself, byte for byte        |
//! | any other string              | `keccak256(string bytes)`              |
//! | none                          | block height, big-endian, 32 bytes     |
//!
//! Two deployments in the same block with identical factory, implementation
//! and calldata and no explicit salt derive the same address; callers that
//! need distinct instances must pass a salt.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;
use tiny_keccak::{Hasher, Keccak};

/// Which rule produced a salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaltSource {
    /// A 32-byte hex string used verbatim.
    Explicit,
    /// keccak256 of an arbitrary string.
    Hashed,
    /// The fallback block height.
    BlockHeight,
}

impl fmt::Display for SaltSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Hashed => write!(f, "hashed"),
            Self::BlockHeight => write!(f, "block_height"),
        }
    }
}

/// keccak256 of arbitrary bytes.
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data.as_ref());
    hasher.finalize(&mut output);
    B256::from(output)
}

/// Parse `s` as a 32-byte hex salt: `0x` followed by exactly 64 hex digits.
pub fn parse_hex_salt(s: &str) -> Option<B256> {
    let hex = s.strip_prefix("0x")?;
    if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    s.parse().ok()
}

/// Encode a block height as a 32-byte big-endian word.
pub fn block_height_salt(block_height: u64) -> B256 {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&block_height.to_be_bytes());
    B256::from(out)
}

/// Salt for a user-supplied string: pass-through or hash.
pub fn salt_from_str(raw: &str) -> (B256, SaltSource) {
    match parse_hex_salt(raw) {
        Some(salt) => (salt, SaltSource::Explicit),
        None => (keccak256(raw.as_bytes()), SaltSource::Hashed),
    }
}

/// Resolve the salt from an optional user string and the fallback block height.
pub fn resolve_salt(raw: Option<&str>, block_height: u64) -> (B256, SaltSource) {
    match raw {
        Some(s) => salt_from_str(s),
        None => (block_height_salt(block_height), SaltSource::BlockHeight),
    }
}
