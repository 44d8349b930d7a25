//! State Integrity Service
//!
//! Implements the blocking `IntegrityApi` on top of `ChainEngine`.
//! Configuration is injected once at construction and never changes.

use serde_json::Value;
use shared_crypto::Digest;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{Sha256Backend, SystemClock};
use crate::config::{ChainConfig, EngineConfig, DEFAULT_POW_DIFFICULTY};
use crate::domain::{
    detach_integrity, embed_integrity, link_input, merkle, parse_digests, parse_record, pow, to_canonical_bytes,
    CacheStats, ChainHasher, ChainLink, IntegrityRecord, MerkleProof, ProofOfWorkResult, VerificationReport,
};
use crate::error::IntegrityError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{Clock, DigestBackend, IntegrityApi};
use crate::service::engine::ChainEngine;
use chrono::{DateTime, Utc};

/// Outcome of checking a state document that may carry its own record
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentVerification {
    /// The document embedded a record and was checked against it
    Checked {
        record: IntegrityRecord,
        report: VerificationReport,
    },
    /// No embedded record; a fresh record for the content is returned instead
    Unsealed(IntegrityRecord),
}

/// Blocking integrity service
///
/// Implements the `IntegrityApi` port using an injected digest backend and
/// clock.
pub struct IntegrityService<B: DigestBackend, C: Clock = SystemClock> {
    engine: ChainEngine<B>,
    clock: C,
    config: EngineConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl IntegrityService<Sha256Backend, SystemClock> {
    /// In-process SHA-256 service with the given configuration
    pub fn sha256(config: EngineConfig) -> Result<Self, IntegrityError> {
        Self::new(Arc::new(Sha256Backend), config)
    }

    /// In-process SHA-256 service configured from `SI_*` environment variables
    pub fn from_env() -> Result<Self, IntegrityError> {
        Self::sha256(EngineConfig::from_env())
    }
}

impl<B: DigestBackend> IntegrityService<B, SystemClock> {
    /// Create a new service using the wall clock
    pub fn new(backend: Arc<B>, config: EngineConfig) -> Result<Self, IntegrityError> {
        Self::with_clock(backend, config, SystemClock)
    }
}

impl<B: DigestBackend, C: Clock> IntegrityService<B, C> {
    /// Create a new service with an explicit clock
    pub fn with_clock(backend: Arc<B>, config: EngineConfig, clock: C) -> Result<Self, IntegrityError> {
        config.validate()?;

        Ok(Self {
            engine: ChainEngine::new(backend, config.cache_capacity),
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

    pub fn engine(&self) -> &ChainEngine<B> {
        &self.engine
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.engine.cache_stats()
    }

    /// Chained hash under the configured defaults at `depth`
    pub fn chain_hash_at(&self, data: &[u8], depth: Option<u32>) -> Result<Digest, IntegrityError> {
        IntegrityApi::chain_hash(self, data, &self.config.chain_at(depth))
    }

    /// Merkle root of hex-encoded digests
    pub fn merkle_root_hex<S: AsRef<str>>(&self, hashes: &[S], depth: Option<u32>) -> Result<Digest, IntegrityError> {
        let leaves = parse_digests(hashes)?;
        IntegrityApi::merkle_root(self, &leaves, depth)
    }

    /// Inclusion proof for the leaf at `index`
    pub fn merkle_proof(&self, hashes: &[Digest], index: usize, depth: Option<u32>) -> Result<MerkleProof, IntegrityError> {
        merkle::merkle_proof(&self.engine, hashes, index, &self.config.chain_at(depth))
    }

    /// Check an inclusion proof against its own root
    pub fn verify_merkle_proof(&self, proof: &MerkleProof, depth: Option<u32>) -> Result<bool, IntegrityError> {
        merkle::verify_merkle_proof(
            &self.engine,
            &proof.leaf,
            &proof.path,
            &proof.root,
            &self.config.chain_at(depth),
        )
    }

    /// Recompute a single proof-of-work attempt
    pub fn verify_proof_of_work(
        &self,
        data: &[u8],
        nonce: u64,
        difficulty: usize,
        depth: Option<u32>,
    ) -> Result<bool, IntegrityError> {
        pow::verify_proof_of_work(
            &self.engine.uncached(),
            data,
            nonce,
            difficulty,
            &self.config.chain_at(depth),
        )
    }

    /// Append a link stamped with an explicit timestamp
    pub fn chain_link_at(
        &self,
        previous: &Digest,
        data: &[u8],
        depth: Option<u32>,
        timestamp: DateTime<Utc>,
    ) -> Result<ChainLink, IntegrityError> {
        let hash = self.link_digest(previous, data, depth, &timestamp)?;
        self.metrics.record_link();
        debug!(previous = %previous, hash = %hash, "chain link appended");

        Ok(ChainLink {
            hash,
            previous: *previous,
            timestamp,
        })
    }

    /// Re-derive a link from its data and stored timestamp
    pub fn verify_chain_link(&self, link: &ChainLink, data: &[u8], depth: Option<u32>) -> Result<bool, IntegrityError> {
        let hash = self.link_digest(&link.previous, data, depth, &link.timestamp)?;
        Ok(hash == link.hash)
    }

    fn link_digest(
        &self,
        previous: &Digest,
        data: &[u8],
        depth: Option<u32>,
        timestamp: &DateTime<Utc>,
    ) -> Result<Digest, IntegrityError> {
        let config = self.config.chain_at(depth);
        config.validate()?;
        self.engine
            .chain_hash(&link_input(previous, data, timestamp), &config)
    }

    /// Check a state document that may carry its own record.
    ///
    /// The record is looked up at `integrity` or `metadata.integrity` and
    /// never covered by the digest.
    pub fn verify_document(&self, document: &Value) -> Result<DocumentVerification, IntegrityError> {
        let (content, embedded) = detach_integrity(document);
        match embedded {
            Some(record) => {
                let record = parse_record(&record)?;
                let report = IntegrityApi::verify_integrity(self, &content, &record)?;
                Ok(DocumentVerification::Checked { record, report })
            }
            None => {
                warn!("no integrity record embedded in document");
                IntegrityApi::create_integrity(self, &content, None).map(DocumentVerification::Unsealed)
            }
        }
    }

    /// Create a record for a document and embed it at `integrity`.
    ///
    /// An existing embedded record is replaced, never hashed.
    pub fn seal_document(&self, document: &Value, depth: Option<u32>) -> Result<(Value, IntegrityRecord), IntegrityError> {
        let (content, _) = detach_integrity(document);
        let record = IntegrityApi::create_integrity(self, &content, depth)?;
        let sealed = embed_integrity(&content, &record)?;
        Ok((sealed, record))
    }

    fn plain_digest(&self, bytes: &[u8]) -> Result<Digest, IntegrityError> {
        Ok(self.engine.backend().digest(bytes)?)
    }
}

impl<B: DigestBackend, C: Clock> IntegrityApi for IntegrityService<B, C> {
    fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        self.engine.chain_hash(data, config)
    }

    #[instrument(skip(self, state))]
    fn create_integrity(&self, state: &Value, depth: Option<u32>) -> Result<IntegrityRecord, IntegrityError> {
        let config = self.config.chain_at(depth);
        config.validate()?;

        let bytes = to_canonical_bytes(state)?;
        let plain = self.plain_digest(&bytes)?;
        let chained = self.engine.chain_hash(&bytes, &config)?;

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
    fn verify_integrity(&self, state: &Value, record: &IntegrityRecord) -> Result<VerificationReport, IntegrityError> {
        let checked_at = self.clock.now();
        let bytes = to_canonical_bytes(state)?;
        let plain = self.plain_digest(&bytes)?;

        if !record.is_recognized() {
            warn!(
                algorithm = %record.algorithm_id,
                version = %record.format_version,
                "record written by unrecognized algorithm"
            );
            self.metrics.record_verification(false);
            return Ok(VerificationReport::unrecognized(record, &plain, checked_at));
        }

        let config = self.config.chain_at(Some(record.chain_depth));
        let chained = match config.validate() {
            Ok(()) => Ok(self.engine.chain_hash(&bytes, &config)?),
            Err(err) => Err(err.to_string()),
        };

        let report = VerificationReport::compare(record, &plain, chained, checked_at);
        self.metrics.record_verification(report.valid);

        if report.valid {
            debug!("integrity verified");
        } else {
            warn!(
                sha256_valid = report.sha256_valid,
                sha_infinity_valid = report.sha_infinity_valid,
                reason = report.reason.as_deref().unwrap_or(""),
                "integrity check failed"
            );
        }
        Ok(report)
    }

    #[instrument(skip(self, hashes), fields(leaves = hashes.len()))]
    fn merkle_root(&self, hashes: &[Digest], depth: Option<u32>) -> Result<Digest, IntegrityError> {
        let root = merkle::merkle_root(&self.engine, hashes, &self.config.chain_at(depth))?;
        self.metrics.record_merkle_root();
        debug!(root = %root, "merkle root computed");
        Ok(root)
    }

    #[instrument(skip(self, data))]
    fn proof_of_work(
        &self,
        data: &[u8],
        difficulty: Option<usize>,
        depth: Option<u32>,
    ) -> Result<ProofOfWorkResult, IntegrityError> {
        let difficulty = difficulty.unwrap_or(DEFAULT_POW_DIFFICULTY);
        let result = pow::proof_of_work(
            &self.engine.uncached(),
            data,
            difficulty,
            &self.config.chain_at(depth),
            self.config.pow_max_attempts,
        )?;

        self.metrics.record_pow(result.attempts, result.verified);
        if result.verified {
            debug!(nonce = result.nonce, attempts = result.attempts, "proof-of-work found");
        } else {
            warn!(attempts = result.attempts, difficulty, "proof-of-work budget exhausted");
        }
        Ok(result)
    }

    fn chain_link(&self, previous: &Digest, data: &[u8], depth: Option<u32>) -> Result<ChainLink, IntegrityError> {
        self.chain_link_at(previous, data, depth, self.clock.now())
    }
}
