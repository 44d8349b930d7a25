//! # Chain Result Cache (Bounded LRU)
//!
//! Whole-chain memoization of `(input, depth, config fingerprint) -> digest`.
//!
//! ## Invariants
//!
//! - A hit returns exactly what a recomputation would: the key covers every
//!   input of the computation.
//! - Size never exceeds capacity; the least recently used entry is evicted.
//! - Safe for concurrent use; the lock is never held while hashing.

use lru::LruCache;
use parking_lot::Mutex;
use shared_crypto::Digest;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::ChainConfig;
use crate::error::IntegrityError;

/// Cache key: the full chain input plus everything that shapes the output
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub input: Vec<u8>,
    pub depth: u32,
    pub fingerprint: String,
}

impl CacheKey {
    pub fn new(data: &[u8], config: &ChainConfig) -> Self {
        Self {
            input: data.to_vec(),
            depth: config.depth,
            fingerprint: config.fingerprint(),
        }
    }
}

/// Point-in-time cache statistics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Thread-safe bounded LRU of chained-hash results
pub struct DigestCache {
    entries: Mutex<LruCache<CacheKey, Digest>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl DigestCache {
    /// Create a cache holding at most `capacity` results
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// `None` when `capacity` is 0 (caching disabled)
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(Self::new)
    }

    /// Look up a result, marking it most recently used
    pub fn get(&self, key: &CacheKey) -> Option<Digest> {
        let found = self.entries.lock().get(key).copied();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store a result, evicting the least recently used entry when full
    pub fn insert(&self, key: CacheKey, digest: Digest) {
        let displaced = self.entries.lock().push(key.clone(), digest);
        if let Some((old_key, _)) = displaced {
            if old_key != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Return the cached result or compute, store and return it.
    ///
    /// `compute` runs without the lock held; two racing callers may both
    /// compute, which is harmless because the result is deterministic.
    pub fn get_or_try_insert_with<F>(&self, key: CacheKey, compute: F) -> Result<Digest, IntegrityError>
    where
        F: FnOnce() -> Result<Digest, IntegrityError>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let digest = compute()?;
        self.insert(key, digest);
        Ok(digest)
    }

    /// Check for a key without touching recency or counters
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Drop every entry; counters are kept
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let (len, capacity) = {
            let entries = self.entries.lock();
            (entries.len(), entries.cap().get())
        };

        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len,
            capacity,
        }
    }
}
