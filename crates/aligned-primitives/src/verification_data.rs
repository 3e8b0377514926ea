//! Verification data and its canonical commitment
//!
//! A [`VerificationData`] carries the opaque artifacts of one proof: the proof
//! bytes, optional public input, and either a verification key (circuit-based
//! systems) or VM program code (VM-based systems). The batcher never sees the
//! commitment itself; it recomputes it from the same artifacts, so the
//! derivation here has to match byte for byte:
//!
//! ```text
//! proof_commitment                   = H(proof)
//! public_input_commitment            = H(pub_input)          | 0^32
//! proving_system_aux_data_commitment = H(vm_program_code)    | H(verification_key) | 0^32
//! proof_generator_addr               = 20 bytes of the hex address
//! ```
//!
//! When both auxiliary artifacts are present the program code wins.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::Result;
use crate::hash::{keccak256, Hash256, Hasher};
use crate::proving_system::ProvingSystemId;

/// Artifacts of a single proof submitted for verification
///
/// Field names follow the batcher's JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationData {
    pub proving_system: ProvingSystemId,
    pub proof: Vec<u8>,
    pub pub_input: Option<Vec<u8>>,
    pub verification_key: Option<Vec<u8>>,
    pub vm_program_code: Option<Vec<u8>>,
    /// Hex address of the account that generated the proof
    pub proof_generator_addr: String,
}

impl VerificationData {
    /// Create verification data with only a proof; attach the rest with the
    /// `with_*` helpers
    pub fn new(
        proving_system: ProvingSystemId,
        proof: Vec<u8>,
        proof_generator_addr: impl Into<String>,
    ) -> Self {
        Self {
            proving_system,
            proof,
            pub_input: None,
            verification_key: None,
            vm_program_code: None,
            proof_generator_addr: proof_generator_addr.into(),
        }
    }

    pub fn with_pub_input(mut self, pub_input: Vec<u8>) -> Self {
        self.pub_input = Some(pub_input);
        self
    }

    pub fn with_verification_key(mut self, verification_key: Vec<u8>) -> Self {
        self.verification_key = Some(verification_key);
        self
    }

    pub fn with_vm_program_code(mut self, vm_program_code: Vec<u8>) -> Self {
        self.vm_program_code = Some(vm_program_code);
        self
    }

    /// Derive the commitment for this data
    pub fn commitment(&self) -> Result<VerificationDataCommitment> {
        VerificationDataCommitment::from_data(self)
    }
}

/// Fixed-shape commitment to a [`VerificationData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationDataCommitment {
    pub proof_commitment: Hash256,
    pub public_input_commitment: Hash256,
    pub proving_system_aux_data_commitment: Hash256,
    pub proof_generator_addr: Address,
}

impl VerificationDataCommitment {
    /// Compute the commitment of `data`
    ///
    /// Fails only if the proof generator address is not 20 bytes of hex. Any
    /// byte sequence, including an empty proof, is accepted.
    pub fn from_data(data: &VerificationData) -> Result<Self> {
        let mut hasher = Hasher::new();

        let proof_commitment = hasher.update(&data.proof).finalize_reset();

        let public_input_commitment = match &data.pub_input {
            Some(pub_input) => hasher.update(pub_input).finalize_reset(),
            None => Hash256::zero(),
        };

        let proving_system_aux_data_commitment =
            match (&data.vm_program_code, &data.verification_key) {
                (Some(program), _) => hasher.update(program).finalize_reset(),
                (None, Some(vk)) => hasher.update(vk).finalize_reset(),
                (None, None) => Hash256::zero(),
            };

        let proof_generator_addr = data.proof_generator_addr.parse::<Address>()?;

        Ok(Self {
            proof_commitment,
            public_input_commitment,
            proving_system_aux_data_commitment,
            proof_generator_addr,
        })
    }

    /// Hash of the four fields concatenated in declaration order
    ///
    /// This is both the payload the submitter signs and the leaf of the
    /// batch Merkle tree.
    pub fn batch_hash(&self) -> Hash256 {
        let mut hasher = Hasher::new();
        hasher
            .update(self.proof_commitment)
            .update(self.public_input_commitment)
            .update(self.proving_system_aux_data_commitment)
            .update(self.proof_generator_addr);
        hasher.finalize()
    }
}

/// Hex commitment of a verification key (lowercase, no prefix)
pub fn verification_key_commitment(vk: &[u8]) -> String {
    keccak256(vk).to_hex()
}
