//! Fuzz target for Merkle inclusion
//!
//! Every leaf of a built tree must verify at its own index, and the
//! verifier must never panic on arbitrary paths and indices.

#![no_main]

use aligned_primitives::{compute_root, Hash256, MerkleTree};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct MerkleInput {
    leaves: Vec<[u8; 32]>,
    path: Vec<[u8; 32]>,
    index: usize,
}

fuzz_target!(|input: MerkleInput| {
    let path: Vec<Hash256> = input.path.into_iter().take(64).map(Hash256).collect();
    let _ = compute_root(&path, input.index, Hash256::zero());

    let leaves: Vec<Hash256> = input.leaves.into_iter().take(256).map(Hash256).collect();
    let Some(tree) = MerkleTree::from_leaves(leaves.clone()) else {
        assert!(leaves.is_empty());
        return;
    };

    let index = input.index % leaves.len();
    let proof = tree.proof(index).expect("index is in range");
    assert_eq!(compute_root(&proof.merkle_path, index, leaves[index]), tree.root());
    assert!(tree.proof(leaves.len()).is_none());
});
