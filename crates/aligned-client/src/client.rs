//! Batcher client: submit proofs and collect inclusion data

use aligned_primitives::{VerificationData, VerificationDataCommitment};
use tracing::{info, warn};

use crate::codec::{serialize, sign_with_commitment};
use crate::config::{BatcherConfig, DEFAULT_BATCHER_ADDRESS};
use crate::error::{ClientError, Result};
use crate::session::BatcherSession;
use crate::signer::Signer;
use crate::transport::{Connector, Frame, WebSocketConnector};
use crate::types::{AlignedVerificationData, VerificationFailure};

/// Client for an Aligned batcher
///
/// Each submission opens its own session, so one client can be shared
/// between tasks. The batcher matches responses to submissions purely by
/// order: the i-th response is taken to be about the i-th item sent.
pub struct BatcherClient<C: Connector = WebSocketConnector> {
    config: BatcherConfig,
    connector: C,
}

impl BatcherClient<WebSocketConnector> {
    /// Create a client that talks WebSocket to the configured batcher
    pub fn new(config: BatcherConfig) -> Self {
        Self::with_connector(config, WebSocketConnector)
    }

    /// Create a client for the batcher at `address` with default settings
    pub fn with_address(address: impl Into<String>) -> Self {
        Self::new(BatcherConfig::new(address))
    }
}

impl Default for BatcherClient<WebSocketConnector> {
    fn default() -> Self {
        Self::new(BatcherConfig::default())
    }
}

impl<C: Connector> BatcherClient<C> {
    /// Create a client with a custom transport connector
    pub fn with_connector(config: BatcherConfig, connector: C) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }

    /// Address used when no batcher is configured
    pub fn default_address() -> &'static str {
        DEFAULT_BATCHER_ADDRESS
    }

    /// Batcher this client submits to
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// Point later submissions at a different batcher
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.config.address = address.into();
    }

    /// Submit one item
    ///
    /// Returns `None` if the batcher's inclusion proof for it did not verify.
    pub async fn submit(
        &self,
        data: &VerificationData,
        signer: &dyn Signer,
    ) -> Result<Option<AlignedVerificationData>> {
        let mut verified = self.submit_multiple(std::slice::from_ref(data), signer).await?;
        Ok(verified.pop())
    }

    /// Submit a batch and return the items whose inclusion verified
    ///
    /// Items whose Merkle path does not reconstruct the returned root are
    /// left out of the result; use [`Self::submit_multiple_tagged`] to see
    /// which ones.
    pub async fn submit_multiple(
        &self,
        items: &[VerificationData],
        signer: &dyn Signer,
    ) -> Result<Vec<AlignedVerificationData>> {
        let outcomes = self.submit_multiple_tagged(items, signer).await?;

        let total = outcomes.len();
        let verified: Vec<AlignedVerificationData> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(aligned) => Some(aligned),
                Err(failure) => {
                    warn!(
                        position = failure.position,
                        root = %failure.response.batch_merkle_root,
                        "dropping item with unverifiable inclusion proof"
                    );
                    None
                }
            })
            .collect();

        info!(
            submitted = total,
            verified = verified.len(),
            "batch submission complete"
        );
        Ok(verified)
    }

    /// Submit a batch and return one verification outcome per item, in
    /// submission order
    pub async fn submit_multiple_tagged(
        &self,
        items: &[VerificationData],
        signer: &dyn Signer,
    ) -> Result<Vec<std::result::Result<AlignedVerificationData, VerificationFailure>>> {
        if items.is_empty() {
            return Err(ClientError::EmptyBatch);
        }

        let commitments = items
            .iter()
            .map(VerificationDataCommitment::from_data)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let frames = items
            .iter()
            .zip(&commitments)
            .map(|(data, commitment)| {
                let message = sign_with_commitment(data, commitment, signer)?;
                Ok(Frame::Text(serialize(&message)?))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            items = items.len(),
            address = %self.config.address,
            "submitting batch"
        );

        let mut session = BatcherSession::open(
            &self.connector,
            &self.config.address,
            self.config.protocol_version,
        )
        .await?;
        session.send_batch(frames).await?;
        let responses = session
            .receive_responses(self.config.response_timeout)
            .await?;

        Ok(commitments
            .into_iter()
            .zip(responses)
            .enumerate()
            .map(|(position, (commitment, response))| {
                AlignedVerificationData::try_from_response(commitment, response, position)
            })
            .collect())
    }
}
