//! Wire messages and submission results

use aligned_primitives::{
    verify_merkle_path, Hash256, InclusionProof, VerificationData, VerificationDataCommitment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EXPLORER_URL;
use crate::signer::Signature;

/// Signed submission envelope sent to the batcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessage {
    pub verification_data: VerificationData,
    pub signature: Signature,
}

/// Batcher response for one submitted item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInclusionData {
    pub batch_merkle_root: Hash256,
    pub batch_inclusion_proof: InclusionProof,
    pub index_in_batch: usize,
}

impl BatchInclusionData {
    /// Whether this response proves inclusion of `commitment`
    pub fn includes(&self, commitment: &VerificationDataCommitment) -> bool {
        verify_merkle_path(
            &self.batch_inclusion_proof.merkle_path,
            &self.batch_merkle_root,
            self.index_in_batch,
            commitment,
        )
    }
}

/// Proof that a commitment was included in a batch
///
/// Only ever constructed from a response whose Merkle path checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedVerificationData {
    pub verification_data_commitment: VerificationDataCommitment,
    pub batch_merkle_root: Hash256,
    pub batch_inclusion_proof: InclusionProof,
    pub index_in_batch: usize,
}

impl AlignedVerificationData {
    /// Pair a commitment with its response, verifying the inclusion path
    pub fn try_from_response(
        commitment: VerificationDataCommitment,
        response: BatchInclusionData,
        position: usize,
    ) -> Result<Self, VerificationFailure> {
        if !response.includes(&commitment) {
            return Err(VerificationFailure {
                position,
                commitment,
                response,
            });
        }

        Ok(Self {
            verification_data_commitment: commitment,
            batch_merkle_root: response.batch_merkle_root,
            batch_inclusion_proof: response.batch_inclusion_proof,
            index_in_batch: response.index_in_batch,
        })
    }

    /// Re-run the inclusion check, e.g. on data loaded from disk
    pub fn verify_inclusion(&self) -> bool {
        verify_merkle_path(
            &self.batch_inclusion_proof.merkle_path,
            &self.batch_merkle_root,
            self.index_in_batch,
            &self.verification_data_commitment,
        )
    }

    pub fn explorer_link(&self) -> String {
        explorer_link(&self.batch_merkle_root)
    }
}

/// An item whose returned Merkle path does not reconstruct the claimed root
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Item {position} not provably included in batch {}", .response.batch_merkle_root)]
pub struct VerificationFailure {
    /// Position of the item in the submitted batch
    pub position: usize,
    pub commitment: VerificationDataCommitment,
    pub response: BatchInclusionData,
}

/// Explorer page for a batch
pub fn explorer_link(batch_merkle_root: &Hash256) -> String {
    format!("{}/batches/0x{}", EXPLORER_URL, batch_merkle_root.to_hex())
}
