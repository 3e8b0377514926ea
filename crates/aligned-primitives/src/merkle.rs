//! Keccak Merkle trees over batch commitments
//!
//! The batcher places each submission's [`VerificationDataCommitment::batch_hash`]
//! at a leaf of a binary Merkle tree and returns the sibling path for that
//! leaf. Verification walks the path bottom-up: at each level the running
//! hash goes on the left when the index is even and on the right when it is
//! odd, and the index is shifted right by one.
//!
//! [`MerkleTree`] is the matching builder. The submission path never needs
//! it, only fixtures and the mock batcher do.

use serde::{Deserialize, Serialize};

use crate::hash::{keccak256_pair, Hash256};
use crate::verification_data::VerificationDataCommitment;

/// Sibling hashes from leaf to root
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InclusionProof {
    pub merkle_path: Vec<Hash256>,
}

impl InclusionProof {
    pub fn new(merkle_path: Vec<Hash256>) -> Self {
        Self { merkle_path }
    }

    /// Number of levels between the leaf and the root
    pub fn depth(&self) -> usize {
        self.merkle_path.len()
    }

    /// Siblings concatenated leaf-first, as the on-chain verifier takes them
    pub fn flattened(&self) -> Vec<u8> {
        self.merkle_path
            .iter()
            .flat_map(|node| node.as_bytes().iter().copied())
            .collect()
    }
}

/// Check that `commitment` sits at `leaf_index` under `claimed_root`
///
/// The leaf hash is recomputed from the commitment on every call.
pub fn verify_merkle_path(
    path: &[Hash256],
    claimed_root: &Hash256,
    leaf_index: usize,
    commitment: &VerificationDataCommitment,
) -> bool {
    let leaf = commitment.batch_hash();
    compute_root(path, leaf_index, leaf) == *claimed_root
}

/// Fold `path` over `leaf` using the even/odd ordering rule
pub fn compute_root(path: &[Hash256], leaf_index: usize, leaf: Hash256) -> Hash256 {
    let mut index = leaf_index;
    let mut acc = leaf;

    for sibling in path {
        acc = if index % 2 == 0 {
            keccak256_pair(&acc, sibling)
        } else {
            keccak256_pair(sibling, &acc)
        };
        index >>= 1;
    }

    acc
}

/// Binary Keccak Merkle tree
///
/// The leaf level is padded to a power of two (and at least two leaves) by
/// repeating the last leaf, so every leaf has a sibling at every level.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// Number of real (unpadded) leaves
    num_leaves: usize,

    /// Level 0 is the padded leaf level, the last level holds only the root
    levels: Vec<Vec<Hash256>>,
}

impl MerkleTree {
    /// Build a tree from leaf hashes. Returns `None` for an empty leaf set.
    pub fn from_leaves(leaves: Vec<Hash256>) -> Option<Self> {
        let last = *leaves.last()?;
        let num_leaves = leaves.len();

        let width = num_leaves.next_power_of_two().max(2);
        let mut padded = leaves;
        padded.resize(width, last);

        let mut levels = vec![padded];
        while levels[levels.len() - 1].len() > 1 {
            let next: Vec<Hash256> = levels[levels.len() - 1]
                .chunks(2)
                .map(|pair| keccak256_pair(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }

        Some(Self { num_leaves, levels })
    }

    /// Build a tree whose leaves are the batch hashes of `commitments`
    pub fn from_commitments(commitments: &[VerificationDataCommitment]) -> Option<Self> {
        Self::from_leaves(commitments.iter().map(|c| c.batch_hash()).collect())
    }

    pub fn root(&self) -> Hash256 {
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves excluding padding
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Number of levels above the leaves
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Inclusion proof for a leaf, `None` if the index is out of range
    pub fn proof(&self, leaf_index: usize) -> Option<InclusionProof> {
        if leaf_index >= self.num_leaves {
            return None;
        }

        let mut index = leaf_index;
        let mut merkle_path = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.levels.len() - 1] {
            merkle_path.push(level[index ^ 1]);
            index >>= 1;
        }

        Some(InclusionProof { merkle_path })
    }
}
