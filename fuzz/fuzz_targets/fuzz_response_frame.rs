//! Fuzz target for inbound batcher frames
//!
//! Handshake and response decoding must reject garbage with an error, never
//! a panic, and a decoded response must be safe to verify against any
//! commitment.

#![no_main]

use aligned_client::codec::{decode_protocol_version, decode_response};
use aligned_primitives::{ProvingSystemId, VerificationData};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|frame: &[u8]| {
    match decode_protocol_version(frame) {
        Ok(_) => assert_eq!(frame.len(), 2),
        Err(_) => assert_ne!(frame.len(), 2),
    }

    if let Ok(response) = decode_response(frame) {
        // Cap the walk so a huge index or path stays cheap
        if response.batch_inclusion_proof.depth() <= 64 {
            let commitment = VerificationData::new(
                ProvingSystemId::Groth16Bn254,
                frame.to_vec(),
                "0x0000000000000000000000000000000000000000",
            )
            .commitment()
            .expect("zero address is valid");
            let _ = response.includes(&commitment);
        }
    }
});
