//! Inbound Ports (Driving Ports)
//!
//! The API that task-board mutation logic, audit tooling and rate limiting
//! middleware use. Two flavors with identical results: blocking and
//! suspending.

use async_trait::async_trait;
use serde_json::Value;
use shared_crypto::Digest;

use crate::config::ChainConfig;
use crate::domain::{ChainLink, IntegrityRecord, ProofOfWorkResult, VerificationReport};
use crate::error::IntegrityError;

/// Blocking integrity API (Driving Port)
pub trait IntegrityApi: Send + Sync {
    /// SHA-Infinity digest of `data` under an explicit config
    fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError>;

    /// Create a record for `state`
    ///
    /// # Arguments
    /// * `state` - Any JSON value; hashed in canonical form
    /// * `depth` - Chain depth, or the configured default
    fn create_integrity(&self, state: &Value, depth: Option<u32>) -> Result<IntegrityRecord, IntegrityError>;

    /// Check `state` against `record`
    ///
    /// Uses the depth stored in the record. Mismatches are reported in the
    /// result, never as errors.
    fn verify_integrity(
        &self,
        state: &Value,
        record: &IntegrityRecord,
    ) -> Result<VerificationReport, IntegrityError>;

    /// Merkle root of an ordered digest sequence
    fn merkle_root(&self, hashes: &[Digest], depth: Option<u32>) -> Result<Digest, IntegrityError>;

    /// Bounded nonce search; difficulty defaults to 4
    fn proof_of_work(
        &self,
        data: &[u8],
        difficulty: Option<usize>,
        depth: Option<u32>,
    ) -> Result<ProofOfWorkResult, IntegrityError>;

    /// Append a link to an audit trail, stamped with the current time
    fn chain_link(&self, previous: &Digest, data: &[u8], depth: Option<u32>) -> Result<ChainLink, IntegrityError>;
}

/// Suspending integrity API (Driving Port)
///
/// For environments where the digest primitive is only reachable through a
/// non-blocking interface.
#[async_trait]
pub trait AsyncIntegrityApi: Send + Sync {
    async fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError>;

    async fn create_integrity(&self, state: &Value, depth: Option<u32>) -> Result<IntegrityRecord, IntegrityError>;

    async fn verify_integrity(
        &self,
        state: &Value,
        record: &IntegrityRecord,
    ) -> Result<VerificationReport, IntegrityError>;

    async fn merkle_root(&self, hashes: &[Digest], depth: Option<u32>) -> Result<Digest, IntegrityError>;

    /// Dropping the returned future abandons the search
    async fn proof_of_work(
        &self,
        data: &[u8],
        difficulty: Option<usize>,
        depth: Option<u32>,
    ) -> Result<ProofOfWorkResult, IntegrityError>;

    async fn chain_link(
        &self,
        previous: &Digest,
        data: &[u8],
        depth: Option<u32>,
    ) -> Result<ChainLink, IntegrityError>;
}
