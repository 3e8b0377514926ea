//! Signing capability
//!
//! The client never holds keys. Whoever submits supplies a [`Signer`] that
//! signs the 32-byte batch commitment hash of each item; how the signature
//! is produced (local key, hardware wallet, remote KMS) is up to them.

use aligned_primitives::Hash256;
use serde::{Deserialize, Serialize};

use crate::error::SignerError;

/// Recoverable ECDSA signature
///
/// `r` and `s` travel as `0x`-prefixed hex strings, `v` as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "prefixed_hex")]
    pub r: [u8; 32],
    #[serde(with = "prefixed_hex")]
    pub s: [u8; 32],
    pub v: u64,
}

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32], v: u64) -> Self {
        Self { r, s, v }
    }

    /// Split a 65-byte `r ‖ s ‖ v` signature
    pub fn from_rsv(bytes: &[u8; 65]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self { r, s, v: bytes[64] as u64 }
    }
}

/// Something that can sign a batch commitment hash
pub trait Signer: Send + Sync {
    fn sign(&self, payload: &Hash256) -> Result<Signature, SignerError>;
}

impl<F> Signer for F
where
    F: Fn(&Hash256) -> Result<Signature, SignerError> + Send + Sync,
{
    fn sign(&self, payload: &Hash256) -> Result<Signature, SignerError> {
        self(payload)
    }
}

mod prefixed_hex {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        let mut out = [0u8; 32];
        hex::decode_to_slice(digits, &mut out).map_err(de::Error::custom)?;
        Ok(out)
    }
}
