//! Crypto error types.

use thiserror::Error;

/// Digest primitive errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// No hashing backend can serve the request
    #[error("Digest primitive unavailable: {0}")]
    PrimitiveUnavailable(String),

    /// Text that should have been a digest is malformed
    #[error("Invalid digest {input:?}: {reason}")]
    InvalidDigest {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },
}
