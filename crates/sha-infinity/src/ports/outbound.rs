//! Outbound Ports (Driven Ports)
//!
//! What the engine needs from its environment: a digest primitive, reachable
//! either directly or only through a non-blocking interface, and a clock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_crypto::{CryptoError, Digest};

/// Blocking digest primitive (Driven Port)
///
/// Implementations must be deterministic and return 32-byte digests.
pub trait DigestBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Digest `data`
    ///
    /// Returns `CryptoError::PrimitiveUnavailable` when no backend can serve
    /// the request.
    fn digest(&self, data: &[u8]) -> Result<Digest, CryptoError>;
}

/// Suspending digest primitive (Driven Port)
///
/// Must produce byte-identical output to the blocking primitive.
#[async_trait]
pub trait AsyncDigestBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Digest `data`
    async fn digest(&self, data: &[u8]) -> Result<Digest, CryptoError>;
}

/// Source of record and verification timestamps (Driven Port)
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
