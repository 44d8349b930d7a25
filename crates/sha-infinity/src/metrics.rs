//! Metrics hooks for integrity operations
//!
//! Counters for chain computations, record checks, Merkle roots and
//! proof-of-work searches. Cache hit/miss counts live on the cache itself
//! (`DigestCache::stats`).
//!
//! ## Usage
//!
//! ```ignore
//! use sha_infinity::metrics::{IntegrityMetrics, MetricsRecorder};
//!
//! let metrics = IntegrityMetrics::new();
//! let start = std::time::Instant::now();
//! let digest = engine.chain_hash(b"payload", &config)?;
//! metrics.record_chain(8, start.elapsed());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for integrity operations
#[derive(Default)]
pub struct IntegrityMetrics {
    /// Chained hashes computed (cache hits excluded)
    pub chains_computed: AtomicU64,
    /// Base digest applications across all chains
    pub digest_applications: AtomicU64,
    /// Cumulative chain time in nanoseconds
    pub chain_time_ns: AtomicU64,
    /// Integrity records created
    pub records_created: AtomicU64,
    /// Verifications performed
    pub verifications: AtomicU64,
    /// Verifications that reported a mismatch
    pub verification_failures: AtomicU64,
    /// Merkle roots computed
    pub merkle_roots: AtomicU64,
    /// Proof-of-work searches run
    pub pow_searches: AtomicU64,
    /// Proof-of-work searches that found a nonce
    pub pow_solved: AtomicU64,
    /// Proof-of-work attempts across all searches
    pub pow_attempts: AtomicU64,
    /// Audit links created
    pub links_created: AtomicU64,
}

impl IntegrityMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one computed chain
    ///
    /// # Arguments
    /// * `applications` - Base digest applications the chain cost
    /// * `duration` - Time taken
    pub fn record_chain(&self, applications: u32, duration: Duration) {
        self.chains_computed.fetch_add(1, Ordering::Relaxed);
        self.digest_applications
            .fetch_add(u64::from(applications), Ordering::Relaxed);
        self.chain_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_record_created(&self) {
        self.records_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verification(&self, valid: bool) {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        if !valid {
            self.verification_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_merkle_root(&self) {
        self.merkle_roots.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished proof-of-work search
    pub fn record_pow(&self, attempts: u64, verified: bool) {
        self.pow_searches.fetch_add(1, Ordering::Relaxed);
        self.pow_attempts.fetch_add(attempts, Ordering::Relaxed);
        if verified {
            self.pow_solved.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_link(&self) {
        self.links_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            chains_computed: self.chains_computed.load(Ordering::Relaxed),
            digest_applications: self.digest_applications.load(Ordering::Relaxed),
            avg_chain_ns: self.avg_chain_time_ns(),
            records_created: self.records_created.load(Ordering::Relaxed),
            verifications: self.verifications.load(Ordering::Relaxed),
            verification_failures: self.verification_failures.load(Ordering::Relaxed),
            merkle_roots: self.merkle_roots.load(Ordering::Relaxed),
            pow_searches: self.pow_searches.load(Ordering::Relaxed),
            pow_solved: self.pow_solved.load(Ordering::Relaxed),
            pow_attempts: self.pow_attempts.load(Ordering::Relaxed),
            links_created: self.links_created.load(Ordering::Relaxed),
        }
    }

    /// Average chain time in nanoseconds
    pub fn avg_chain_time_ns(&self) -> u64 {
        let total = self.chain_time_ns.load(Ordering::Relaxed);
        let count = self.chains_computed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.chains_computed,
            &self.digest_applications,
            &self.chain_time_ns,
            &self.records_created,
            &self.verifications,
            &self.verification_failures,
            &self.merkle_roots,
            &self.pow_searches,
            &self.pow_solved,
            &self.pow_attempts,
            &self.links_created,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub chains_computed: u64,
    pub digest_applications: u64,
    pub avg_chain_ns: u64,
    pub records_created: u64,
    pub verifications: u64,
    pub verification_failures: u64,
    pub merkle_roots: u64,
    pub pow_searches: u64,
    pub pow_solved: u64,
    pub pow_attempts: u64,
    pub links_created: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward engine counters to an external
/// metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_chain(&self, applications: u32, duration: Duration);
    fn record_record_created(&self);
    fn record_verification(&self, valid: bool);
    fn record_merkle_root(&self);
    fn record_pow(&self, attempts: u64, verified: bool);
    fn record_link(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_chain(&self, _: u32, _: Duration) {}
    fn record_record_created(&self) {}
    fn record_verification(&self, _: bool) {}
    fn record_merkle_root(&self) {}
    fn record_pow(&self, _: u64, _: bool) {}
    fn record_link(&self) {}
}

impl MetricsRecorder for IntegrityMetrics {
    fn record_chain(&self, applications: u32, duration: Duration) {
        IntegrityMetrics::record_chain(self, applications, duration);
    }

    fn record_record_created(&self) {
        IntegrityMetrics::record_record_created(self);
    }

    fn record_verification(&self, valid: bool) {
        IntegrityMetrics::record_verification(self, valid);
    }

    fn record_merkle_root(&self) {
        IntegrityMetrics::record_merkle_root(self);
    }

    fn record_pow(&self, attempts: u64, verified: bool) {
        IntegrityMetrics::record_pow(self, attempts, verified);
    }

    fn record_link(&self) {
        IntegrityMetrics::record_link(self);
    }
}
