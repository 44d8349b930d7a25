//! Engine configuration and validation
//!
//! `ChainConfig` describes one chained-hash computation. `EngineConfig`
//! bundles it with the process-level knobs (cache size, proof-of-work budget)
//! and is injected once at construction; nothing here is mutated afterwards.
//!
//! # Example
//!
//! ```ignore
//! use sha_infinity::config::ChainConfigBuilder;
//!
//! let config = ChainConfigBuilder::new()
//!     .depth(12)
//!     .include_depth_in_hash(false)
//!     .build()
//!     .expect("Valid config");
//! ```

use crate::error::{DepthViolation, IntegrityError};
use serde::{Deserialize, Serialize};

/// Smallest accepted chain depth
pub const MIN_DEPTH: u32 = 1;

/// Largest accepted chain depth
pub const MAX_DEPTH: u32 = 256;

/// Chain depth used when callers do not pass one
pub const DEFAULT_DEPTH: u32 = 7;

/// Salt prepended to the seed digest input
pub const DEFAULT_SALT: &str = "blackroad-infinity";

/// Cached whole-chain results kept by default
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Proof-of-work attempt budget
pub const DEFAULT_POW_MAX_ATTEMPTS: u64 = 10_000_000;

/// Leading-zero count used when callers do not pass a difficulty
pub const DEFAULT_POW_DIFFICULTY: usize = 4;

/// Parameters of a single chained-hash computation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Total digest applications before the optional depth binding
    pub depth: u32,
    /// Prefix the seed input with `salt`
    pub use_salt: bool,
    /// Salt text, ignored when `use_salt` is false
    pub salt: String,
    /// Fold the depth into one final digest
    pub include_depth_in_hash: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            use_salt: true,
            salt: DEFAULT_SALT.to_string(),
            include_depth_in_hash: true,
        }
    }
}

impl ChainConfig {
    /// Check a depth against `[MIN_DEPTH, MAX_DEPTH]`
    pub fn validate_depth(depth: u32) -> Result<(), IntegrityError> {
        let violation = if depth < MIN_DEPTH {
            DepthViolation::TooLow
        } else if depth > MAX_DEPTH {
            DepthViolation::TooHigh
        } else {
            return Ok(());
        };

        Err(IntegrityError::InvalidDepth {
            depth,
            min: MIN_DEPTH,
            max: MAX_DEPTH,
            violation,
        })
    }

    /// Validate the configuration. Called before any hashing.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        Self::validate_depth(self.depth)
    }

    /// Builder-style method to set the depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Builder-style method to toggle the depth binding step
    pub fn with_depth_binding(mut self, include: bool) -> Self {
        self.include_depth_in_hash = include;
        self
    }

    /// Builder-style method to set a salt (and enable salting)
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.use_salt = true;
        self.salt = salt.into();
        self
    }

    /// Builder-style method to disable salting
    pub fn without_salt(mut self) -> Self {
        self.use_salt = false;
        self
    }

    /// Stable identity of everything except the depth.
    ///
    /// Two configs with equal fingerprints and equal depths produce equal
    /// digests for equal input. The salt only participates when enabled.
    pub fn fingerprint(&self) -> String {
        let salt = if self.use_salt {
            format!("salt[{}]={}", self.salt.len(), self.salt)
        } else {
            "nosalt".to_string()
        };
        let binding = if self.include_depth_in_hash { "bind" } else { "nobind" };
        format!("{};{}", salt, binding)
    }
}

/// Builder for ChainConfig with validation
#[derive(Default)]
pub struct ChainConfigBuilder {
    depth: Option<u32>,
    use_salt: Option<bool>,
    salt: Option<String>,
    include_depth_in_hash: Option<bool>,
}

impl ChainConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chain depth (must be between MIN_DEPTH and MAX_DEPTH)
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Enable or disable salting
    pub fn use_salt(mut self, use_salt: bool) -> Self {
        self.use_salt = Some(use_salt);
        self
    }

    /// Set the salt text
    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Enable or disable the final depth binding
    pub fn include_depth_in_hash(mut self, include: bool) -> Self {
        self.include_depth_in_hash = Some(include);
        self
    }

    /// Build the ChainConfig, validating the depth
    pub fn build(self) -> Result<ChainConfig, IntegrityError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation. The engine still validates before hashing.
    pub fn build_unchecked(self) -> ChainConfig {
        let defaults = ChainConfig::default();

        ChainConfig {
            depth: self.depth.unwrap_or(defaults.depth),
            use_salt: self.use_salt.unwrap_or(defaults.use_salt),
            salt: self.salt.unwrap_or(defaults.salt),
            include_depth_in_hash: self
                .include_depth_in_hash
                .unwrap_or(defaults.include_depth_in_hash),
        }
    }
}

/// Process-level engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Defaults for every chained-hash computation
    pub chain: ChainConfig,
    /// Maximum cached chain results; 0 disables the cache
    pub cache_capacity: usize,
    /// Proof-of-work attempt budget
    pub pow_max_attempts: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            pow_max_attempts: DEFAULT_POW_MAX_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SI_CHAIN_DEPTH`: Default chain depth (default: 7)
    /// - `SI_SALT`: Salt text (default: blackroad-infinity)
    /// - `SI_USE_SALT`: Enable salting (default: true)
    /// - `SI_INCLUDE_DEPTH`: Bind depth into the digest (default: true)
    /// - `SI_CACHE_CAPACITY`: Cache entries, 0 disables (default: 1024)
    /// - `SI_POW_MAX_ATTEMPTS`: Proof-of-work budget (default: 10000000)
    ///
    /// Unparseable values fall back to the default; call `validate()` on the
    /// result before use.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| {
                    let v = v.to_lowercase();
                    v != "false" && v != "0"
                })
                .unwrap_or(default)
        };

        Self {
            chain: ChainConfig {
                depth: lookup("SI_CHAIN_DEPTH")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.chain.depth),
                use_salt: flag("SI_USE_SALT", defaults.chain.use_salt),
                salt: lookup("SI_SALT").unwrap_or(defaults.chain.salt),
                include_depth_in_hash: flag("SI_INCLUDE_DEPTH", defaults.chain.include_depth_in_hash),
            },
            cache_capacity: lookup("SI_CACHE_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_capacity),
            pow_max_attempts: lookup("SI_POW_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pow_max_attempts),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), IntegrityError> {
        self.chain.validate()?;

        if self.pow_max_attempts == 0 {
            return Err(IntegrityError::InvalidConfig(
                "pow_max_attempts cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Chain config at `depth`, or the default depth when `None`
    pub fn chain_at(&self, depth: Option<u32>) -> ChainConfig {
        match depth {
            Some(depth) => self.chain.clone().with_depth(depth),
            None => self.chain.clone(),
        }
    }

    /// Builder-style method to set cache capacity
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Builder-style method to set the proof-of-work budget
    pub fn with_pow_max_attempts(mut self, attempts: u64) -> Self {
        self.pow_max_attempts = attempts;
        self
    }

    /// Builder-style method to replace the chain defaults
    pub fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chain = chain;
        self
    }
}
