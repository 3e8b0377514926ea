//! Error types for the batcher client

use aligned_primitives::PrimitivesError;
use thiserror::Error;

use crate::session::SessionState;

/// Boxed error returned by a [`Signer`](crate::Signer)
pub type SignerError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Batch cannot be empty")]
    EmptyBatch,

    #[error("Malformed proof generator address: {0}")]
    MalformedAddress(String),

    #[error("Invalid verification data: {0}")]
    InvalidVerificationData(String),

    #[error("Session is {actual:?}, expected {expected:?}")]
    InvalidSessionState {
        actual: SessionState,
        expected: SessionState,
    },

    #[error("Cannot connect to batcher at {address}: {reason}")]
    ConnectFailed { address: String, reason: String },

    #[error("Unsupported protocol version: expected {expected}, got {got}")]
    ProtocolVersionMismatch { expected: u16, got: u16 },

    #[error("Malformed handshake frame: expected 2 bytes, got {len}")]
    MalformedHandshake { len: usize },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Signing failed: {0}")]
    SigningFailed(#[source] SignerError),

    #[error("Connection closed after {received} of {expected} responses")]
    ConnectionClosedEarly { expected: usize, received: usize },

    #[error("Timed out after {received} of {expected} responses")]
    ResponseTimeout { expected: usize, received: usize },

    #[error("Invalid response frame: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("RPC endpoint returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("RPC error ({code}): {message}")]
    RpcError { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidRpcResponse(String),
}

/// Coarse grouping of [`ClientError`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller input or API misuse rejected before any network activity
    Precondition,
    /// Connection, handshake or transport failure
    Connect,
    /// The signer refused the payload
    Signing,
    /// Responses could not be matched to the submitted batch
    Correlation,
    /// On-chain inclusion query failed
    Onchain,
    Serialization,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::EmptyBatch
            | ClientError::MalformedAddress(_)
            | ClientError::InvalidVerificationData(_)
            | ClientError::InvalidSessionState { .. } => ErrorCategory::Precondition,
            ClientError::ConnectFailed { .. }
            | ClientError::ProtocolVersionMismatch { .. }
            | ClientError::MalformedHandshake { .. }
            | ClientError::Transport(_) => ErrorCategory::Connect,
            ClientError::SigningFailed(_) => ErrorCategory::Signing,
            ClientError::ConnectionClosedEarly { .. }
            | ClientError::ResponseTimeout { .. }
            | ClientError::InvalidResponse(_) => ErrorCategory::Correlation,
            ClientError::Request(_)
            | ClientError::ApiError { .. }
            | ClientError::RpcError { .. }
            | ClientError::InvalidRpcResponse(_) => ErrorCategory::Onchain,
            ClientError::Json(_) => ErrorCategory::Serialization,
        }
    }

    pub(crate) fn connect_failed(address: &str, reason: impl ToString) -> Self {
        Self::ConnectFailed {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<PrimitivesError> for ClientError {
    fn from(err: PrimitivesError) -> Self {
        match err {
            PrimitivesError::MalformedAddress(addr) => ClientError::MalformedAddress(addr),
            other => ClientError::InvalidVerificationData(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
