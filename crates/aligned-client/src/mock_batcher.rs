//! Local batcher double for tests and demos
//!
//! Speaks the same protocol as a real batcher: a 2-byte version handshake,
//! JSON submissions in, one JSON inclusion response per submission out, in
//! submission order. It builds a real Merkle tree over the batch, so clients
//! can verify what it returns. It checks no signatures and verifies no
//! proofs.
//!
//! Knobs on [`MockBatcherConfig`] make it misbehave in the ways a client
//! has to cope with: wrong version, truncated handshake, closing early, and
//! returning roots that do not match.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aligned_primitives::MerkleTree;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::{JoinHandle, JoinSet};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::PROTOCOL_VERSION;
use crate::error::{ClientError, Result};
use crate::types::{BatchInclusionData, ClientMessage};

/// Pause after a failed accept before trying again
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Behaviour of a [`MockBatcher`]
#[derive(Debug, Clone)]
pub struct MockBatcherConfig {
    /// Version announced in the handshake
    pub protocol_version: u16,
    /// Raw handshake bytes sent instead of the version
    pub handshake_override: Option<Vec<u8>>,
    /// Seal a batch after this many submissions
    pub batch_size: Option<usize>,
    /// Without a batch size, seal once no submission arrived for this long
    pub batch_window: Duration,
    /// Close the connection after this many responses
    pub responses_before_close: Option<usize>,
    /// Positions whose response carries a wrong root
    pub corrupt_indices: Vec<usize>,
}

impl Default for MockBatcherConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            handshake_override: None,
            batch_size: None,
            batch_window: Duration::from_millis(250),
            responses_before_close: None,
            corrupt_indices: Vec::new(),
        }
    }
}

impl MockBatcherConfig {
    pub fn with_protocol_version(mut self, version: u16) -> Self {
        self.protocol_version = version;
        self
    }

    pub fn with_handshake(mut self, raw: Vec<u8>) -> Self {
        self.handshake_override = Some(raw);
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn with_batch_window(mut self, window: Duration) -> Self {
        self.batch_window = window;
        self
    }

    pub fn with_responses_before_close(mut self, count: usize) -> Self {
        self.responses_before_close = Some(count);
        self
    }

    pub fn with_corrupt_indices(mut self, indices: Vec<usize>) -> Self {
        self.corrupt_indices = indices;
        self
    }

    fn handshake(&self) -> Vec<u8> {
        self.handshake_override
            .clone()
            .unwrap_or_else(|| self.protocol_version.to_be_bytes().to_vec())
    }
}

/// A running mock batcher
///
/// Dropping it stops the server and every session still in flight.
pub struct MockBatcher {
    local_addr: SocketAddr,
    received: Arc<Mutex<Vec<ClientMessage>>>,
    handle: JoinHandle<()>,
}

impl MockBatcher {
    /// Listen on an ephemeral localhost port
    pub async fn spawn(config: MockBatcherConfig) -> Result<Self> {
        Self::bind("127.0.0.1:0", config).await
    }

    /// Listen on `addr`
    pub async fn bind(addr: &str, config: MockBatcherConfig) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ClientError::connect_failed(addr, e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ClientError::connect_failed(addr, e))?;

        let received = Arc::new(Mutex::new(Vec::new()));
        let handle = tokio::spawn(accept_loop(listener, config, received.clone()));
        info!(%local_addr, "mock batcher listening");

        Ok(Self {
            local_addr,
            received,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// WebSocket URL clients should connect to
    pub fn url(&self) -> String {
        format!("ws://{}", self.local_addr)
    }

    /// Every submission received so far, across all sessions
    pub fn received(&self) -> Vec<ClientMessage> {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Serve until the task is aborted or the runtime shuts down
    pub async fn wait(&mut self) {
        if let Err(e) = (&mut self.handle).await {
            if !e.is_cancelled() {
                warn!(error = %e, "mock batcher task ended abnormally");
            }
        }
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for MockBatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn accept_loop(
    listener: TcpListener,
    config: MockBatcherConfig,
    received: Arc<Mutex<Vec<ClientMessage>>>,
) {
    // Sessions are aborted when this set is dropped with the accept task
    let mut sessions = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let config = config.clone();
                    let received = received.clone();
                    sessions.spawn(async move {
                        debug!(%peer, "client connected");
                        if let Err(e) = serve_session(stream, &config, &received).await {
                            warn!(%peer, error = %e, "mock batcher session failed");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
            Some(finished) = sessions.join_next(), if !sessions.is_empty() => {
                if let Err(e) = finished {
                    if !e.is_cancelled() {
                        warn!(error = %e, "mock batcher session panicked");
                    }
                }
            }
        }
    }
}

fn transport_error(e: impl ToString) -> ClientError {
    ClientError::Transport(e.to_string())
}

async fn serve_session(
    stream: TcpStream,
    config: &MockBatcherConfig,
    received: &Mutex<Vec<ClientMessage>>,
) -> Result<()> {
    let mut ws = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(transport_error)?;

    ws.send(Message::Binary(config.handshake().into()))
        .await
        .map_err(transport_error)?;

    let mut batch: Vec<ClientMessage> = Vec::new();
    loop {
        if config.batch_size == Some(batch.len()) {
            break;
        }

        let next = match config.batch_size {
            Some(_) => Ok(ws.next().await),
            None => tokio::time::timeout(config.batch_window, ws.next()).await,
        };

        match next {
            Err(_) if batch.is_empty() => continue,
            Err(_) => break,
            Ok(None) | Ok(Some(Ok(Message::Close(_)))) => {
                debug!(items = batch.len(), "client left before batch was sealed");
                return Ok(());
            }
            Ok(Some(Ok(Message::Text(text)))) => {
                let message: ClientMessage = serde_json::from_str(&text)?;
                batch.push(message);
            }
            Ok(Some(Ok(Message::Binary(bytes)))) => {
                let message: ClientMessage = serde_json::from_slice(&bytes)?;
                batch.push(message);
            }
            Ok(Some(Ok(_))) => continue,
            Ok(Some(Err(e))) => return Err(transport_error(e)),
        }
    }

    received
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .extend(batch.iter().cloned());

    let commitments = batch
        .iter()
        .map(|message| message.verification_data.commitment())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let tree = MerkleTree::from_commitments(&commitments).ok_or(ClientError::EmptyBatch)?;
    info!(items = commitments.len(), root = %tree.root(), "batch sealed");

    let limit = config
        .responses_before_close
        .unwrap_or(commitments.len())
        .min(commitments.len());

    for index in 0..limit {
        let batch_inclusion_proof = tree
            .proof(index)
            .ok_or_else(|| transport_error(format!("no proof for leaf {}", index)))?;

        let mut batch_merkle_root = tree.root();
        if config.corrupt_indices.contains(&index) {
            batch_merkle_root.0[0] ^= 0xff;
        }

        let response = BatchInclusionData {
            batch_merkle_root,
            batch_inclusion_proof,
            index_in_batch: index,
        };
        ws.send(Message::Binary(serde_json::to_vec(&response)?.into()))
            .await
            .map_err(transport_error)?;
    }

    if let Err(e) = ws.close(None).await {
        debug!(error = %e, "close after responses");
    }
    Ok(())
}
