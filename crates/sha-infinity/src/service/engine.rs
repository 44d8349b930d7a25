//! Blocking chain engine
//!
//! Binds the domain chain construction to a `DigestBackend` and the shared
//! result cache.

use shared_crypto::Digest;
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

use crate::config::ChainConfig;
use crate::domain::{chain_hash_with, digest_applications, CacheKey, CacheStats, ChainHasher, DigestCache};
use crate::error::IntegrityError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::DigestBackend;

/// Chained-hash engine over a blocking digest primitive
pub struct ChainEngine<B: DigestBackend> {
    backend: Arc<B>,
    cache: Option<Arc<DigestCache>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<B: DigestBackend> ChainEngine<B> {
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

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> Option<&Arc<DigestCache>> {
        self.cache.as_ref()
    }

    /// Cache statistics, `None` when caching is disabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// View of this engine that never reads or fills the cache.
    ///
    /// Proof-of-work attempts are one-off inputs and would only flush
    /// useful entries.
    pub fn uncached(&self) -> Uncached<'_, B> {
        Uncached(self)
    }

    fn compute(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        let start = Instant::now();
        let digest = chain_hash_with(data, config, |input| {
            self.backend.digest(input).map_err(IntegrityError::from)
        })?;

        self.metrics
            .record_chain(digest_applications(config), start.elapsed());
        trace!(depth = config.depth, backend = self.backend.name(), "chain computed");
        Ok(digest)
    }
}

impl<B: DigestBackend> ChainHasher for ChainEngine<B> {
    fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        // Invalid configs must not count as cache misses
        config.validate()?;

        match &self.cache {
            Some(cache) => {
                cache.get_or_try_insert_with(CacheKey::new(data, config), || self.compute(data, config))
            }
            None => self.compute(data, config),
        }
    }
}

/// Cache-bypassing view of a `ChainEngine`
pub struct Uncached<'a, B: DigestBackend>(&'a ChainEngine<B>);

impl<B: DigestBackend> ChainHasher for Uncached<'_, B> {
    fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError> {
        self.0.compute(data, config)
    }
}
