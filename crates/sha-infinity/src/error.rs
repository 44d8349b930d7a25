//! Error types for the SHA-Infinity engine

use shared_crypto::CryptoError;
use std::fmt;
use thiserror::Error;

/// Which side of the depth range was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthViolation {
    /// Depth below the minimum
    TooLow,
    /// Depth above the maximum
    TooHigh,
}

impl fmt::Display for DepthViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthViolation::TooLow => write!(f, "too low"),
            DepthViolation::TooHigh => write!(f, "too high"),
        }
    }
}

/// Errors raised by the integrity engine.
///
/// All of these are detected before any digest is computed. Integrity
/// mismatches are not errors; they are reported in `VerificationReport`.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("Invalid chain depth {depth} ({violation}): must be between {min} and {max}")]
    InvalidDepth {
        depth: u32,
        min: u32,
        max: u32,
        violation: DepthViolation,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Digest primitive unavailable: {0}")]
    PrimitiveUnavailable(String),

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Invalid proof-of-work difficulty {difficulty}: must be at most {max}")]
    InvalidDifficulty { difficulty: usize, max: usize },

    #[error("Leaf index out of range: {index} >= {len}")]
    LeafIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<CryptoError> for IntegrityError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::PrimitiveUnavailable(msg) => IntegrityError::PrimitiveUnavailable(msg),
            err @ CryptoError::InvalidDigest { .. } => IntegrityError::InvalidDigest(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for IntegrityError {
    fn from(err: serde_json::Error) -> Self {
        IntegrityError::Serialization(err.to_string())
    }
}
