//! End-to-end tests against a local mock batcher over real WebSockets
//!
//! Each test spawns its own batcher on an ephemeral port, so they run in
//! parallel without sharing state.

use std::time::Duration;

use aligned_client::{
    BatchInclusionCall, BatcherClient, BatcherConfig, ClientError, ErrorCategory, Hash256,
    MockBatcher, MockBatcherConfig, Signature, SignerError,
};
use aligned_primitives::{keccak256, ProvingSystemId, VerificationData};

// =============================================================================
// Test Helpers
// =============================================================================

const GENERATOR: &str = "0x66f9664f97F2b50F62D13eA064982f936dE76657";

fn signer(payload: &Hash256) -> Result<Signature, SignerError> {
    Ok(Signature::new(payload.0, [0x5a; 32], 27))
}

fn groth16_item(seed: u8) -> VerificationData {
    VerificationData::new(ProvingSystemId::Groth16Bn254, vec![seed; 32], GENERATOR)
        .with_pub_input(vec![seed, seed])
        .with_verification_key(vec![0xf0, seed])
}

fn sp1_item(seed: u8) -> VerificationData {
    VerificationData::new(ProvingSystemId::Sp1, vec![seed; 48], GENERATOR)
        .with_vm_program_code(vec![0x7f, b'E', b'L', b'F', seed])
}

async fn batcher(config: MockBatcherConfig) -> (MockBatcher, BatcherClient) {
    let batcher = MockBatcher::spawn(config).await.unwrap();
    let client = BatcherClient::new(
        BatcherConfig::new(batcher.url()).with_response_timeout(Duration::from_secs(10)),
    );
    (batcher, client)
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_single_submission() {
    let (batcher, client) = batcher(MockBatcherConfig::default().with_batch_size(1)).await;

    let data = VerificationData::new(
        ProvingSystemId::Groth16Bn254,
        vec![1, 2, 3],
        "0x0000000000000000000000000000000000000000",
    );
    let aligned = client.submit(&data, &signer).await.unwrap().unwrap();

    let commitment = aligned.verification_data_commitment;
    assert_eq!(commitment.proof_commitment, keccak256([1u8, 2, 3]));
    assert!(commitment.public_input_commitment.is_zero());
    assert!(commitment.proving_system_aux_data_commitment.is_zero());
    assert_eq!(aligned.index_in_batch, 0);
    assert_eq!(aligned.batch_inclusion_proof.depth(), 1);
    assert!(aligned.verify_inclusion());
    assert!(aligned
        .explorer_link()
        .starts_with("https://explorer.alignedlayer.com/batches/0x"));

    let received = batcher.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].signature.r, commitment.batch_hash().0);
}

#[tokio::test]
async fn test_mixed_batch_preserves_order() {
    let items = vec![groth16_item(1), sp1_item(2), groth16_item(3), sp1_item(4), sp1_item(5)];
    let (batcher, client) = batcher(MockBatcherConfig::default().with_batch_size(items.len())).await;

    let verified = client.submit_multiple(&items, &signer).await.unwrap();
    assert_eq!(verified.len(), items.len());

    let root = verified[0].batch_merkle_root;
    for (position, (aligned, item)) in verified.iter().zip(&items).enumerate() {
        assert_eq!(aligned.index_in_batch, position);
        assert_eq!(aligned.batch_merkle_root, root);
        assert_eq!(aligned.verification_data_commitment, item.commitment().unwrap());
        // 5 leaves pad to 8
        assert_eq!(aligned.batch_inclusion_proof.depth(), 3);
    }

    let received: Vec<_> = batcher
        .received()
        .into_iter()
        .map(|m| m.verification_data)
        .collect();
    assert_eq!(received, items);
}

#[tokio::test]
async fn test_duplicate_submissions() {
    let item = sp1_item(7);
    let (_batcher, client) = batcher(MockBatcherConfig::default().with_batch_size(2)).await;

    let verified = client
        .submit_multiple(&[item.clone(), item.clone()], &signer)
        .await
        .unwrap();

    assert_eq!(verified.len(), 2);
    assert_eq!(verified[0].index_in_batch, 0);
    assert_eq!(verified[1].index_in_batch, 1);
    assert_eq!(
        verified[0].verification_data_commitment,
        verified[1].verification_data_commitment
    );
}

#[tokio::test]
async fn test_batch_sealed_by_idle_window() {
    let config = MockBatcherConfig::default().with_batch_window(Duration::from_millis(100));
    let (_batcher, client) = batcher(config).await;

    let verified = client
        .submit_multiple(&[groth16_item(1), groth16_item(2), groth16_item(3)], &signer)
        .await
        .unwrap();
    assert_eq!(verified.len(), 3);
}

#[tokio::test]
async fn test_client_reused_across_submissions() {
    let (batcher, client) = batcher(MockBatcherConfig::default().with_batch_size(1)).await;

    for seed in 0..3 {
        let aligned = client.submit(&sp1_item(seed), &signer).await.unwrap();
        assert!(aligned.is_some());
    }
    assert_eq!(batcher.received().len(), 3);
}

// =============================================================================
// Verification Failures
// =============================================================================

#[tokio::test]
async fn test_corrupted_root_is_dropped() {
    let items = vec![groth16_item(1), groth16_item(2), groth16_item(3)];
    let config = MockBatcherConfig::default()
        .with_batch_size(3)
        .with_corrupt_indices(vec![1]);
    let (_batcher, client) = batcher(config.clone()).await;

    let verified = client.submit_multiple(&items, &signer).await.unwrap();
    assert_eq!(verified.len(), 2);
    assert_eq!(verified[0].index_in_batch, 0);
    assert_eq!(verified[1].index_in_batch, 2);

    let (_batcher, client) = batcher(config).await;
    let tagged = client.submit_multiple_tagged(&items, &signer).await.unwrap();
    assert_eq!(tagged.len(), 3);
    assert!(tagged[0].is_ok());
    assert_eq!(tagged[1].as_ref().unwrap_err().position, 1);
    assert!(tagged[2].is_ok());
}

#[tokio::test]
async fn test_single_corrupted_submission_returns_none() {
    let config = MockBatcherConfig::default()
        .with_batch_size(1)
        .with_corrupt_indices(vec![0]);
    let (_batcher, client) = batcher(config).await;

    let result = client.submit(&groth16_item(9), &signer).await.unwrap();
    assert!(result.is_none());
}

// =============================================================================
// Protocol Failures
// =============================================================================

#[tokio::test]
async fn test_protocol_version_mismatch() {
    let config = MockBatcherConfig::default().with_protocol_version(1);
    let (batcher, client) = batcher(config).await;

    let err = client.submit(&groth16_item(1), &signer).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ProtocolVersionMismatch { expected: 0, got: 1 }
    ));
    assert_eq!(err.category(), ErrorCategory::Connect);
    assert!(batcher.received().is_empty());
}

#[tokio::test]
async fn test_configured_protocol_version() {
    let batcher = MockBatcher::spawn(
        MockBatcherConfig::default()
            .with_protocol_version(3)
            .with_batch_size(1),
    )
    .await
    .unwrap();
    let client = BatcherClient::new(BatcherConfig::new(batcher.url()).with_protocol_version(3));

    assert!(client.submit(&sp1_item(1), &signer).await.unwrap().is_some());
}

#[tokio::test]
async fn test_malformed_handshake() {
    let config = MockBatcherConfig::default().with_handshake(vec![0, 0, 0, 0]);
    let (_batcher, client) = batcher(config).await;

    let err = client.submit(&groth16_item(1), &signer).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedHandshake { len: 4 }));
}

#[tokio::test]
async fn test_connection_closed_early() {
    let config = MockBatcherConfig::default()
        .with_batch_size(3)
        .with_responses_before_close(1);
    let (_batcher, client) = batcher(config).await;

    let items = [groth16_item(1), groth16_item(2), groth16_item(3)];
    let err = client.submit_multiple(&items, &signer).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ConnectionClosedEarly { expected: 3, received: 1 }
    ));
    assert_eq!(err.category(), ErrorCategory::Correlation);
}

#[tokio::test]
async fn test_response_timeout() {
    // The batcher waits for a fourth submission that never comes
    let batcher = MockBatcher::spawn(MockBatcherConfig::default().with_batch_size(4))
        .await
        .unwrap();
    let client = BatcherClient::new(
        BatcherConfig::new(batcher.url()).with_response_timeout(Duration::from_millis(200)),
    );

    let items = [groth16_item(1), groth16_item(2), groth16_item(3)];
    let err = client.submit_multiple(&items, &signer).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ResponseTimeout { expected: 3, received: 0 }
    ));
}

#[tokio::test]
async fn test_unreachable_batcher() {
    let client = BatcherClient::new(BatcherConfig::local(1));
    let err = client.submit(&groth16_item(1), &signer).await.unwrap_err();
    assert!(matches!(err, ClientError::ConnectFailed { .. }));
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let (_batcher, client) = batcher(MockBatcherConfig::default()).await;
    let err = client.submit_multiple(&[], &signer).await.unwrap_err();
    assert!(matches!(err, ClientError::EmptyBatch));
}

// =============================================================================
// Saved Results
// =============================================================================

#[tokio::test]
async fn test_saved_result_reverifies_and_encodes() {
    let (_batcher, client) = batcher(MockBatcherConfig::default().with_batch_size(2)).await;
    let verified = client
        .submit_multiple(&[sp1_item(1), groth16_item(2)], &signer)
        .await
        .unwrap();

    let saved = serde_json::to_string_pretty(&verified[1]).unwrap();
    let loaded: aligned_client::AlignedVerificationData = serde_json::from_str(&saved).unwrap();
    assert!(loaded.verify_inclusion());

    let call = BatchInclusionCall::from(&loaded);
    let calldata = call.encode();
    assert_eq!(&calldata[..4], &BatchInclusionCall::selector());
    assert_eq!(call.merkle_proof.len(), 32);
    assert_eq!(call.verification_data_batch_index, 1);
    assert_eq!(
        hex::encode(&calldata[4 + 128..4 + 160]),
        loaded.batch_merkle_root.to_hex()
    );
}
