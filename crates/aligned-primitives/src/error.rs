//! Error types for primitive parsing

use thiserror::Error;

/// Errors raised while parsing or deriving primitive values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitivesError {
    /// Address string is not 20 bytes of hex
    #[error("Malformed address '{0}': expected 20 hex-encoded bytes")]
    MalformedAddress(String),

    /// Proving system name is not one of the supported systems
    #[error("Unknown proving system: {0}")]
    UnknownProvingSystem(String),

    /// Hex string could not be decoded into the requested width
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Result type for primitive operations
pub type Result<T> = std::result::Result<T, PrimitivesError>;
