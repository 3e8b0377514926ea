//! Aligned SDK - client side of the Aligned proof batcher
//!
//! Submitters hand proofs to a batcher, which aggregates many of them into
//! one batch and answers each submission with a Merkle inclusion proof
//! against the batch root. This SDK covers the client half of that exchange.
//!
//! # Crates
//!
//! - `aligned-primitives`: Keccak hashing, commitments, Merkle verification
//! - `aligned-client`: Batcher session, `submit`/`submit_multiple`, on-chain checks
//!
//! # Example
//!
//! ```no_run
//! use aligned_sdk::client::{BatcherClient, BatcherConfig, Signer};
//! use aligned_sdk::primitives::{ProvingSystemId, VerificationData};
//!
//! async fn submit(signer: &dyn Signer) -> aligned_sdk::client::Result<()> {
//!     let client = BatcherClient::new(BatcherConfig::default());
//!     let data = VerificationData::new(
//!         ProvingSystemId::Groth16Bn254,
//!         vec![1, 2, 3],
//!         "0x0000000000000000000000000000000000000000",
//!     )
//!     .with_verification_key(vec![4, 5, 6]);
//!
//!     for aligned in client.submit_multiple(&[data], signer).await? {
//!         println!("{}", aligned.explorer_link());
//!     }
//!     Ok(())
//! }
//! ```

// Re-export sub-crates
pub use aligned_client as client;
pub use aligned_primitives as primitives;

pub use aligned_client::{
    AlignedVerificationData, BatcherClient, BatcherConfig, ClientError, Signature, Signer,
};
pub use aligned_primitives::{ProvingSystemId, VerificationData, VerificationDataCommitment};
