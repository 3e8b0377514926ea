//! Fuzz target for submission envelopes
//!
//! Arbitrary JSON must never panic the decoder, and anything that decodes
//! must re-encode and commit without panicking.

#![no_main]

use aligned_client::ClientMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(message) = serde_json::from_slice::<ClientMessage>(data) else {
        return;
    };

    let encoded = serde_json::to_vec(&message).expect("decoded message re-encodes");
    let again: ClientMessage = serde_json::from_slice(&encoded).expect("re-encoded message decodes");
    assert_eq!(again, message);

    // Fails only on a malformed generator address
    let _ = message.verification_data.commitment();
});
