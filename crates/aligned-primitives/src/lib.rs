//! Aligned Primitives
//!
//! Building blocks shared by the batcher client and its tooling:
//! - Keccak-256 hashing and the 32-byte [`Hash256`] digest type
//! - 20-byte proof generator [`Address`]es
//! - The closed set of supported [`ProvingSystemId`]s
//! - [`VerificationData`] and the commitment derived from it
//! - Merkle inclusion verification and a reference tree builder

pub mod address;
pub mod error;
pub mod hash;
pub mod merkle;
pub mod proving_system;
pub mod verification_data;

pub use address::Address;
pub use error::{PrimitivesError, Result};
pub use hash::{keccak256, keccak256_pair, Hash256, Hasher};
pub use merkle::{compute_root, verify_merkle_path, InclusionProof, MerkleTree};
pub use proving_system::ProvingSystemId;
pub use verification_data::{
    verification_key_commitment, VerificationData, VerificationDataCommitment,
};
