//! On-chain batch inclusion check
//!
//! The service manager contract exposes `verifyBatchInclusion`, declared
//! below with `sol!`. [`OnchainVerifier`] builds a call from an
//! [`AlignedVerificationData`] and runs it with `eth_call` against a
//! JSON-RPC node.

use aligned_primitives::{Address, Hash256};
use alloy_json_rpc::{Id, Request, Response, ResponsePayload};
use alloy_primitives::{Bytes, FixedBytes, U256};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use crate::config::OnchainConfig;
use crate::error::{ClientError, Result};
use crate::types::AlignedVerificationData;

sol! {
    /// True when the commitment is a leaf of a batch the contract has attested
    function verifyBatchInclusion(
        bytes32 proofCommitment,
        bytes32 pubInputCommitment,
        bytes32 provingSystemAuxDataCommitment,
        bytes20 proofGeneratorAddr,
        bytes32 batchMerkleRoot,
        bytes merkleProof,
        uint256 verificationDataBatchIndex
    ) external view returns (bool);
}

/// Arguments of a `verifyBatchInclusion` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInclusionCall {
    pub proof_commitment: Hash256,
    pub pub_input_commitment: Hash256,
    pub proving_system_aux_data_commitment: Hash256,
    pub proof_generator_addr: Address,
    pub batch_merkle_root: Hash256,
    /// Sibling hashes concatenated leaf-first
    pub merkle_proof: Vec<u8>,
    pub verification_data_batch_index: u64,
}

impl From<&AlignedVerificationData> for BatchInclusionCall {
    fn from(data: &AlignedVerificationData) -> Self {
        let commitment = &data.verification_data_commitment;
        Self {
            proof_commitment: commitment.proof_commitment,
            pub_input_commitment: commitment.public_input_commitment,
            proving_system_aux_data_commitment: commitment.proving_system_aux_data_commitment,
            proof_generator_addr: commitment.proof_generator_addr,
            batch_merkle_root: data.batch_merkle_root,
            merkle_proof: data.batch_inclusion_proof.flattened(),
            verification_data_batch_index: data.index_in_batch as u64,
        }
    }
}

impl BatchInclusionCall {
    /// Function selector of `verifyBatchInclusion`
    pub fn selector() -> [u8; 4] {
        verifyBatchInclusionCall::SELECTOR
    }

    /// ABI-encoded calldata, selector included
    pub fn encode(&self) -> Vec<u8> {
        self.to_abi_call().abi_encode()
    }

    fn to_abi_call(&self) -> verifyBatchInclusionCall {
        verifyBatchInclusionCall {
            proofCommitment: FixedBytes(self.proof_commitment.0),
            pubInputCommitment: FixedBytes(self.pub_input_commitment.0),
            provingSystemAuxDataCommitment: FixedBytes(self.proving_system_aux_data_commitment.0),
            proofGeneratorAddr: FixedBytes(self.proof_generator_addr.0),
            batchMerkleRoot: FixedBytes(self.batch_merkle_root.0),
            merkleProof: Bytes::from(self.merkle_proof.clone()),
            verificationDataBatchIndex: U256::from(self.verification_data_batch_index),
        }
    }
}

/// Decode the `bool` returned by `verifyBatchInclusion`
fn decode_verdict(output: &[u8]) -> Result<bool> {
    verifyBatchInclusionCall::abi_decode_returns(output, true)
        .map(|ret| ret._0)
        .map_err(|e| ClientError::InvalidRpcResponse(e.to_string()))
}

/// JSON-RPC client for the service manager's inclusion check
pub struct OnchainVerifier {
    client: reqwest::Client,
    config: OnchainConfig,
}

impl OnchainVerifier {
    /// Create a verifier for the configured node and network
    pub fn try_new(config: OnchainConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OnchainConfig {
        &self.config
    }

    /// Ask the service manager whether `data` is included in a verified batch
    pub async fn verify_batch_inclusion(&self, data: &AlignedVerificationData) -> Result<bool> {
        let call = BatchInclusionCall::from(data);
        self.call_verify(&call).await
    }

    /// Run an already built inclusion call
    pub async fn call_verify(&self, call: &BatchInclusionCall) -> Result<bool> {
        let contract = self.config.network.contract_address();
        let tx = TransactionRequest::default()
            .to(alloy_primitives::Address::from(contract.0))
            .input(TransactionInput::new(Bytes::from(call.encode())));
        let request = Request::new("eth_call", Id::Number(1), (tx, "latest"));

        debug!(
            network = %self.config.network,
            contract = %contract,
            root = %call.batch_merkle_root,
            "calling verifyBatchInclusion"
        );

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await?;
        let body: Response<Bytes> = serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidRpcResponse(e.to_string()))?;

        match body.payload {
            ResponsePayload::Success(output) => decode_verdict(&output),
            ResponsePayload::Failure(error) => Err(ClientError::RpcError {
                code: error.code,
                message: error.message.to_string(),
            }),
        }
    }
}
