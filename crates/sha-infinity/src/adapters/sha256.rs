//! In-process SHA-256 backend

use async_trait::async_trait;
use shared_crypto::{sha256, CryptoError, Digest};

use crate::ports::{AsyncDigestBackend, DigestBackend};

/// Backend name reported in logs
pub const SHA256_BACKEND_NAME: &str = "sha256";

/// SHA-256 computed on the calling thread.
///
/// The suspending implementation never actually suspends; it exists so the
/// async engine can run against the same primitive and be compared
/// byte-for-byte with the blocking one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Backend;

impl Sha256Backend {
    pub fn new() -> Self {
        Self
    }
}

impl DigestBackend for Sha256Backend {
    fn name(&self) -> &'static str {
        SHA256_BACKEND_NAME
    }

    fn digest(&self, data: &[u8]) -> Result<Digest, CryptoError> {
        Ok(sha256(data))
    }
}

#[async_trait]
impl AsyncDigestBackend for Sha256Backend {
    fn name(&self) -> &'static str {
        SHA256_BACKEND_NAME
    }

    async fn digest(&self, data: &[u8]) -> Result<Digest, CryptoError> {
        Ok(sha256(data))
    }
}
