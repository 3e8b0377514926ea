//! Keccak-256 hashing and the 32-byte digest type
//!
//! Every commitment, batch hash and Merkle node in the batcher protocol is a
//! Keccak-256 digest. On the wire a digest travels as a JSON array of 32
//! unsigned bytes, so [`Hash256`] serializes as its inner array.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::error::{PrimitivesError, Result};

/// A 256-bit hash (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The all-zero digest, used as the "absent" sentinel in commitments
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Create from bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a 32-byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            PrimitivesError::InvalidHex(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Create from hex string, with or without a `0x` prefix
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes = hex::decode(hex).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Convert to hex string (lowercase, no 0x prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert to a `0x`-prefixed hex string
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// Accumulating Keccak-256 hasher
///
/// Bytes fed through [`Hasher::update`] are absorbed in call order;
/// [`Hasher::finalize_reset`] returns the digest and leaves the hasher empty
/// so the same instance can be reused for the next value.
#[derive(Clone, Default)]
pub struct Hasher {
    inner: Keccak256,
}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Hasher(keccak256)")
    }
}

impl Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb more input
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        Digest::update(&mut self.inner, data.as_ref());
        self
    }

    /// Discard any absorbed input
    pub fn reset(&mut self) {
        Digest::reset(&mut self.inner);
    }

    /// Produce the digest of everything absorbed and reset the state
    pub fn finalize_reset(&mut self) -> Hash256 {
        let result = Digest::finalize_reset(&mut self.inner);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Hash256(bytes)
    }

    /// Produce the digest of everything absorbed, consuming the hasher
    pub fn finalize(self) -> Hash256 {
        let result = self.inner.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Hash256(bytes)
    }
}

/// Compute the Keccak-256 hash of data
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash256 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hash two 32-byte nodes in the given order
pub fn keccak256_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut hasher = Hasher::new();
    hasher.update(left).update(right);
    hasher.finalize()
}
