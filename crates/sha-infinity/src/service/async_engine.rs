//! Suspending chain engine
//!
//! Same construction as the blocking engine, driven step by step through an
//! `AsyncDigestBackend`. Every input is built with the domain helpers, so
//! both engines hash identical bytes.
//!
//! The chain and the proof-of-work search yield to the executor every
//! `YIELD_INTERVAL` digests; dropping the future between two yields
//! abandons the work.

use shared_crypto::Digest;
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

use crate::config::ChainConfig;
use crate::domain::chain::{binding_input, seed_input, step_input};
use crate::domain::merkle::{level_inputs, pair_config, pair_input, sibling_node, EMPTY_TREE_SENTINEL};
use crate::domain::pow::{attempt_input, search_config, validate_difficulty, validate_search};
use crate::domain::{
    digest_applications, CacheKey, CacheStats, DigestCache, MerkleProof, Position, ProofNode, ProofOfWorkResult,
};
use crate::error::IntegrityError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::AsyncDigestBackend;

/// Digests computed between two cooperative yields
pub const YIELD_INTERVAL: u64 = 16;

/// Chained-hash engine over a suspending digest primitive
pub struct AsyncChainEngine<B: AsyncDigestBackend> {
    backend: Arc<B>,
    cache: Option<Arc<DigestCache>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<B: AsyncDigestBackend> AsyncChainEngine<B> {
    /// Create an engine with its own cache of `cache_capacity` results (0 disables caching)
    pub fn new(backend: Arc<B>, cache_capacity: usize) -> Self {
        Self::with_cache(backend, DigestCache::with_capacity(cache_capacity).map(Arc::new))
    }

    /// Create an engine sharing an existing cache
    pub fn with_cache(backend: Arc<B>, cache: Option<Arc<DigestCache>>) -> Self {
        Self {
            backend,
            cache,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Builder-style method to attach a metrics recorder
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> Option<&Arc<DigestCache>> {
        self.cache.as_ref()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// One application of the base digest, never cached
    pub async fn digest(&self, input: &[u8]) -> Result<Digest, IntegrityError> {
        self.backend.digest(input).await.map_err(IntegrityError::from)
    }

    /// Run the chain without touching the cache
    async fn compute(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        config.validate()?;

        let start = Instant::now();
        let mut current = self.digest(&seed_input(data, config)).await?;
        for step in 1..config.depth {
            if u64::from(step) % YIELD_INTERVAL == 0 {
                tokio::task::yield_now().await;
            }
            current = self.digest(&step_input(&current)).await?;
        }

        if config.include_depth_in_hash {
            current = self.digest(&binding_input(&current, config.depth)).await?;
        }

        self.metrics
            .record_chain(digest_applications(config), start.elapsed());
        trace!(depth = config.depth, backend = self.backend.name(), "chain computed");
        Ok(current)
    }

    /// Chained hash of `data`, served from the cache when possible
    pub async fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        config.validate()?;

        let Some(cache) = &self.cache else {
            return self.compute(data, config).await;
        };

        let key = CacheKey::new(data, config);
        if let Some(hit) = cache.get(&key) {
            return Ok(hit);
        }

        let digest = self.compute(data, config).await?;
        cache.insert(key, digest);
        Ok(digest)
    }

    async fn combine_level(&self, level: &[Digest], config: &ChainConfig) -> Result<Vec<Digest>, IntegrityError> {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for input in level_inputs(level) {
            next.push(self.chain_hash(&input, config).await?);
        }
        Ok(next)
    }

    /// Merkle root of `leaves`
    pub async fn merkle_root(&self, leaves: &[Digest], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        config.validate()?;

        match leaves {
            [] => self.chain_hash(EMPTY_TREE_SENTINEL, config).await,
            [single] => Ok(*single),
            _ => {
                let pair_config = pair_config(config);
                let mut level = leaves.to_vec();
                while level.len() > 1 {
                    level = self.combine_level(&level, &pair_config).await?;
                }
                Ok(level[0])
            }
        }
    }

    /// Build an inclusion proof for the leaf at `index`
    pub async fn merkle_proof(
        &self,
        leaves: &[Digest],
        index: usize,
        config: &ChainConfig,
    ) -> Result<MerkleProof, IntegrityError> {
        config.validate()?;

        if index >= leaves.len() {
            return Err(IntegrityError::LeafIndexOutOfRange {
                index,
                len: leaves.len(),
            });
        }

        let pair_config = pair_config(config);
        let mut path = Vec::new();
        let mut level = leaves.to_vec();
        let mut position = index;

        while level.len() > 1 {
            path.push(sibling_node(&level, position));
            level = self.combine_level(&level, &pair_config).await?;
            position /= 2;
        }

        Ok(MerkleProof {
            leaf: leaves[index],
            index,
            path,
            root: level[0],
        })
    }

    /// Check an inclusion proof against `root`
    pub async fn verify_merkle_proof(
        &self,
        leaf: &Digest,
        path: &[ProofNode],
        root: &Digest,
        config: &ChainConfig,
    ) -> Result<bool, IntegrityError> {
        config.validate()?;

        let pair_config = pair_config(config);
        let mut current = *leaf;
        for node in path {
            let input = match node.position {
                Position::Left => pair_input(&node.hash, &current),
                Position::Right => pair_input(&current, &node.hash),
            };
            current = self.chain_hash(&input, &pair_config).await?;
        }

        Ok(current == *root)
    }

    /// Search nonces `0..max_attempts` in order, bypassing the cache
    pub async fn proof_of_work(
        &self,
        data: &[u8],
        difficulty: usize,
        config: &ChainConfig,
        max_attempts: u64,
    ) -> Result<ProofOfWorkResult, IntegrityError> {
        validate_search(difficulty, config, max_attempts)?;

        let config = search_config(config);
        let mut nonce = 0u64;
        let mut attempts = 0u64;

        loop {
            let hash = self.compute(&attempt_input(data, nonce), &config).await?;
            attempts += 1;

            let verified = hash.meets_difficulty(difficulty);
            if verified || attempts >= max_attempts {
                return Ok(ProofOfWorkResult {
                    hash,
                    nonce,
                    attempts,
                    verified,
                });
            }

            if attempts % YIELD_INTERVAL == 0 {
                tokio::task::yield_now().await;
            }
            nonce += 1;
        }
    }

    /// Recompute a single attempt and check it meets `difficulty`
    pub async fn verify_proof_of_work(
        &self,
        data: &[u8],
        nonce: u64,
        difficulty: usize,
        config: &ChainConfig,
    ) -> Result<bool, IntegrityError> {
        validate_difficulty(difficulty)?;
        let hash = self
            .compute(&attempt_input(data, nonce), &search_config(config))
            .await?;
        Ok(hash.meets_difficulty(difficulty))
    }
}
