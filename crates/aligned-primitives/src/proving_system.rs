//! Supported proving systems

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrimitivesError;

/// Proving system that produced a proof
///
/// Serialized on the wire by its canonical name (e.g. `"Groth16Bn254"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProvingSystemId {
    #[serde(rename = "GnarkPlonkBls12_381")]
    GnarkPlonkBls12381,
    GnarkPlonkBn254,
    Groth16Bn254,
    #[serde(rename = "SP1")]
    Sp1,
    #[serde(rename = "Halo2KZG")]
    Halo2Kzg,
    #[serde(rename = "Halo2IPA")]
    Halo2Ipa,
    Risc0,
}

impl ProvingSystemId {
    /// All supported systems
    pub const ALL: [ProvingSystemId; 7] = [
        ProvingSystemId::GnarkPlonkBls12381,
        ProvingSystemId::GnarkPlonkBn254,
        ProvingSystemId::Groth16Bn254,
        ProvingSystemId::Sp1,
        ProvingSystemId::Halo2Kzg,
        ProvingSystemId::Halo2Ipa,
        ProvingSystemId::Risc0,
    ];

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvingSystemId::GnarkPlonkBls12381 => "GnarkPlonkBls12_381",
            ProvingSystemId::GnarkPlonkBn254 => "GnarkPlonkBn254",
            ProvingSystemId::Groth16Bn254 => "Groth16Bn254",
            ProvingSystemId::Sp1 => "SP1",
            ProvingSystemId::Halo2Kzg => "Halo2KZG",
            ProvingSystemId::Halo2Ipa => "Halo2IPA",
            ProvingSystemId::Risc0 => "Risc0",
        }
    }

    /// Whether proofs of this system are checked against VM program code
    /// rather than a verification key
    pub fn is_vm_based(&self) -> bool {
        matches!(self, ProvingSystemId::Sp1 | ProvingSystemId::Risc0)
    }
}

impl fmt::Display for ProvingSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvingSystemId {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProvingSystemId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PrimitivesError::UnknownProvingSystem(s.to_string()))
    }
}
