//! Suspending State Integrity Service
//!
//! Implements `AsyncIntegrityApi` over `AsyncChainEngine`. Results are
//! byte-identical to `IntegrityService` for the same configuration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use shared_crypto::Digest;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{Sha256Backend, SystemClock};
use crate::config::{ChainConfig, EngineConfig, DEFAULT_POW_DIFFICULTY};
use crate::domain::{
    link_input, parse_digests, to_canonical_bytes, CacheStats, ChainLink, IntegrityRecord, MerkleProof,
    ProofNode, ProofOfWorkResult, VerificationReport,
};
use crate::error::IntegrityError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{AsyncDigestBackend, AsyncIntegrityApi, Clock};
use crate::service::async_engine::AsyncChainEngine;

/// Suspending integrity service
pub struct AsyncIntegrityService<B: AsyncDigestBackend, C: Clock = SystemClock> {
    engine: AsyncChainEngine<B>,
    clock: C,
    config: EngineConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl AsyncIntegrityService<Sha256Backend, SystemClock> {
    /// In-process SHA-256 service with the given configuration
    pub fn sha256(config: EngineConfig) -> Result<Self, IntegrityError> {
        Self::new(Arc::new(Sha256Backend), config)
    }
}

impl<B: AsyncDigestBackend> AsyncIntegrityService<B, SystemClock> {
    pub fn new(backend: Arc<B>, config: EngineConfig) -> Result<Self, IntegrityError> {
        Self::with_clock(backend, config, SystemClock)
    }
}

impl<B: AsyncDigestBackend, C: Clock> AsyncIntegrityService<B, C> {
    pub fn with_clock(backend: Arc<B>, config: EngineConfig, clock: C) -> Result<Self, IntegrityError> {
        config.validate()?;

        Ok(Self {
            engine: AsyncChainEngine::new(backend, config.cache_capacity),
            clock,
            config,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Builder-style method to attach a metrics recorder
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.engine = self.engine.with_metrics(Arc::clone(&metrics));
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.engine.cache_stats()
    }

    pub async fn chain_hash_at(&self, data: &[u8], depth: Option<u32>) -> Result<Digest, IntegrityError> {
        self.engine.chain_hash(data, &self.config.chain_at(depth)).await
    }

    pub async fn merkle_root_hex<S: AsRef<str> + Sync>(
        &self,
        hashes: &[S],
        depth: Option<u32>,
    ) -> Result<Digest, IntegrityError> {
        let leaves = parse_digests(hashes)?;
        let root = self
            .engine
            .merkle_root(&leaves, &self.config.chain_at(depth))
            .await?;
        self.metrics.record_merkle_root();
        Ok(root)
    }

    /// Inclusion proof for the leaf at `index`
    pub async fn merkle_proof(
        &self,
        hashes: &[Digest],
        index: usize,
        depth: Option<u32>,
    ) -> Result<MerkleProof, IntegrityError> {
        self.engine
            .merkle_proof(hashes, index, &self.config.chain_at(depth))
            .await
    }

    pub async fn verify_merkle_proof(
        &self,
        leaf: &Digest,
        path: &[ProofNode],
        root: &Digest,
        depth: Option<u32>,
    ) -> Result<bool, IntegrityError> {
        self.engine
            .verify_merkle_proof(leaf, path, root, &self.config.chain_at(depth))
            .await
    }

    pub async fn verify_proof_of_work(
        &self,
        data: &[u8],
        nonce: u64,
        difficulty: usize,
        depth: Option<u32>,
    ) -> Result<bool, IntegrityError> {
        self.engine
            .verify_proof_of_work(data, nonce, difficulty, &self.config.chain_at(depth))
            .await
    }

    /// Append a link stamped with an explicit timestamp
    pub async fn chain_link_at(
        &self,
        previous: &Digest,
        data: &[u8],
        depth: Option<u32>,
        timestamp: DateTime<Utc>,
    ) -> Result<ChainLink, IntegrityError> {
        let config = self.config.chain_at(depth);
        config.validate()?;

        let hash = self
            .engine
            .chain_hash(&link_input(previous, data, &timestamp), &config)
            .await?;
        self.metrics.record_link();
        debug!(previous = %previous, hash = %hash, "chain link appended");

        Ok(ChainLink {
            hash,
            previous: *previous,
            timestamp,
        })
    }
}

#[async_trait]
impl<B, C> AsyncIntegrityApi for AsyncIntegrityService<B, C>
where
    B: AsyncDigestBackend + 'static,
    C: Clock + 'static,
{
    async fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        self.engine.chain_hash(data, config).await
    }

    #[instrument(skip(self, state))]
    async fn create_integrity(&self, state: &Value, depth: Option<u32>) -> Result<IntegrityRecord, IntegrityError> {
        let config = self.config.chain_at(depth);
        config.validate()?;

        let bytes = to_canonical_bytes(state)?;
        let plain = self.engine.digest(&bytes).await?;
        let chained = self.engine.chain_hash(&bytes, &config).await?;

        let record = IntegrityRecord::new(plain, chained, config.depth, self.clock.now());
        self.metrics.record_record_created();
        info!(
            depth = config.depth,
            sha256 = %plain,
            sha_infinity = %chained,
            "integrity record created"
        );
        Ok(record)
    }

    #[instrument(skip(self, state, record), fields(depth = record.chain_depth))]
    async fn verify_integrity(
        &self,
        state: &Value,
        record: &IntegrityRecord,
    ) -> Result<VerificationReport, IntegrityError> {
        let checked_at = self.clock.now();
        let bytes = to_canonical_bytes(state)?;
        let plain = self.engine.digest(&bytes).await?;

        if !record.is_recognized() {
            warn!(algorithm = %record.algorithm_id, "record written by unrecognized algorithm");
            self.metrics.record_verification(false);
            return Ok(VerificationReport::unrecognized(record, &plain, checked_at));
        }

        let config = self.config.chain_at(Some(record.chain_depth));
        let chained = match config.validate() {
            Ok(()) => Ok(self.engine.chain_hash(&bytes, &config).await?),
            Err(err) => Err(err.to_string()),
        };

        let report = VerificationReport::compare(record, &plain, chained, checked_at);
        self.metrics.record_verification(report.valid);

        if !report.valid {
            warn!(
                sha256_valid = report.sha256_valid,
                sha_infinity_valid = report.sha_infinity_valid,
                "integrity check failed"
            );
        }
        Ok(report)
    }

    #[instrument(skip(self, hashes), fields(leaves = hashes.len()))]
    async fn merkle_root(&self, hashes: &[Digest], depth: Option<u32>) -> Result<Digest, IntegrityError> {
        let root = self
            .engine
            .merkle_root(hashes, &self.config.chain_at(depth))
            .await?;
        self.metrics.record_merkle_root();
        debug!(root = %root, "merkle root computed");
        Ok(root)
    }

    #[instrument(skip(self, data))]
    async fn proof_of_work(
        &self,
        data: &[u8],
        difficulty: Option<usize>,
        depth: Option<u32>,
    ) -> Result<ProofOfWorkResult, IntegrityError> {
        let difficulty = difficulty.unwrap_or(DEFAULT_POW_DIFFICULTY);
        let result = self
            .engine
            .proof_of_work(
                data,
                difficulty,
                &self.config.chain_at(depth),
                self.config.pow_max_attempts,
            )
            .await?;

        self.metrics.record_pow(result.attempts, result.verified);
        if !result.verified {
            warn!(attempts = result.attempts, difficulty, "proof-of-work budget exhausted");
        }
        Ok(result)
    }

    async fn chain_link(
        &self,
        previous: &Digest,
        data: &[u8],
        depth: Option<u32>,
    ) -> Result<ChainLink, IntegrityError> {
        self.chain_link_at(previous, data, depth, self.clock.now()).await
    }
}
