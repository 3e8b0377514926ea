//! Aligned Batcher Client
//!
//! Submits proofs to an Aligned batcher over WebSocket and checks that each
//! one landed in a batch.
//!
//! # Submission flow
//!
//! 1. Every item's [`VerificationDataCommitment`] is computed and its batch
//!    hash signed by the caller's [`Signer`]
//! 2. A session connects, checks the batcher's 2-byte protocol version and
//!    sends all signed envelopes in order
//! 3. One response per envelope is read back; the i-th response is matched
//!    to the i-th item and its Merkle path verified against the batch root
//!
//! ```no_run
//! use aligned_client::{BatcherClient, BatcherConfig, Hash256, Signature, SignerError};
//! use aligned_client::{ProvingSystemId, VerificationData};
//!
//! # async fn run() -> aligned_client::Result<()> {
//! let client = BatcherClient::new(BatcherConfig::default());
//! let data = VerificationData::new(
//!     ProvingSystemId::Sp1,
//!     std::fs::read("proof.bin").unwrap_or_default(),
//!     "0x66f9664f97F2b50F62D13eA064982f936dE76657",
//! )
//! .with_vm_program_code(std::fs::read("program.elf").unwrap_or_default());
//!
//! let signer = |payload: &Hash256| -> Result<Signature, SignerError> {
//!     // sign with the wallet of your choice
//!     Ok(Signature::new(payload.0, [0; 32], 27))
//! };
//!
//! if let Some(aligned) = client.submit(&data, &signer).await? {
//!     println!("included: {}", aligned.explorer_link());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
#[cfg(feature = "mock-batcher")]
pub mod mock_batcher;
pub mod onchain;
pub mod session;
pub mod signer;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::BatcherClient;
pub use config::{
    BatcherConfig, Network, OnchainConfig, DEFAULT_BATCHER_ADDRESS, EXPLORER_URL,
    PROTOCOL_VERSION,
};
pub use error::{ClientError, ErrorCategory, Result, SignerError};
pub use onchain::{BatchInclusionCall, OnchainVerifier};
pub use session::{BatcherSession, SessionState};
pub use signer::{Signature, Signer};
pub use transport::{Connector, Frame, Transport, WebSocketConnector, WebSocketTransport};
pub use types::{
    explorer_link, AlignedVerificationData, BatchInclusionData, ClientMessage, VerificationFailure,
};

#[cfg(feature = "mock-batcher")]
pub use mock_batcher::{MockBatcher, MockBatcherConfig};

// Re-export the primitives callers need to build submissions
pub use aligned_primitives::{
    verification_key_commitment, verify_merkle_path, Address, Hash256, InclusionProof,
    ProvingSystemId, VerificationData, VerificationDataCommitment,
};
