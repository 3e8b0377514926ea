//! Submission envelopes and frame encoding
//!
//! Outbound: each [`VerificationData`] is wrapped in a [`ClientMessage`]
//! signed over its batch commitment hash and sent as one JSON text frame.
//! Inbound: the handshake is a raw 2-byte big-endian version, every later
//! frame is a JSON [`BatchInclusionData`].

use aligned_primitives::{VerificationData, VerificationDataCommitment};

use crate::error::{ClientError, Result};
use crate::signer::Signer;
use crate::types::{BatchInclusionData, ClientMessage};

/// Sign `data` and wrap it in an envelope
pub fn build_envelope(data: &VerificationData, signer: &dyn Signer) -> Result<ClientMessage> {
    let commitment = data.commitment()?;
    sign_with_commitment(data, &commitment, signer)
}

/// Build the envelope for `data` using its already computed commitment
pub fn sign_with_commitment(
    data: &VerificationData,
    commitment: &VerificationDataCommitment,
    signer: &dyn Signer,
) -> Result<ClientMessage> {
    let payload = commitment.batch_hash();
    let signature = signer.sign(&payload).map_err(ClientError::SigningFailed)?;

    Ok(ClientMessage {
        verification_data: data.clone(),
        signature,
    })
}

/// Serialize an envelope to its JSON wire form
pub fn serialize(message: &ClientMessage) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Decode the batcher's handshake frame
pub fn decode_protocol_version(frame: &[u8]) -> Result<u16> {
    let bytes: [u8; 2] = frame
        .try_into()
        .map_err(|_| ClientError::MalformedHandshake { len: frame.len() })?;
    Ok(u16::from_be_bytes(bytes))
}

/// Decode one response frame
pub fn decode_response(frame: &[u8]) -> Result<BatchInclusionData> {
    serde_json::from_slice(frame).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
