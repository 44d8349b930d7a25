//! # SHA-Infinity Chained Hash
//!
//! Applies the base digest `depth` times, each step hashing the previous
//! step's lowercase hex text.
//!
//! # Algorithm
//!
//! 1. Validate `depth` against `[MIN_DEPTH, MAX_DEPTH]` (nothing is hashed on failure)
//! 2. Seed: `H(salt ":" data)` when salted, else `H(data)`
//! 3. `depth - 1` times: `h = H(hex(h))`
//! 4. When depth binding is on: `h = H(hex(h) ":depth:" depth)`
//!
//! # Time Complexity: O(depth)
//!
//! Steps are strictly sequential: each input is the previous output.

use shared_crypto::Digest;

use crate::config::ChainConfig;
use crate::error::IntegrityError;

/// Separator between salt and data in the seed input
pub const SALT_SEPARATOR: &str = ":";

/// Separator between the digest and the depth in the binding step
pub const DEPTH_SEPARATOR: &str = ":depth:";

/// Anything that can compute a chained hash under a given config.
///
/// Merkle aggregation and proof-of-work are written against this trait so
/// they work with or without the result cache.
pub trait ChainHasher {
    /// Chained hash of `data` under `config`
    fn chain_hash(&self, data: &[u8], config: &ChainConfig) -> Result<Digest, IntegrityError>;
}

/// Input of the seed digest
pub fn seed_input(data: &[u8], config: &ChainConfig) -> Vec<u8> {
    if !config.use_salt {
        return data.to_vec();
    }

    let mut input = Vec::with_capacity(config.salt.len() + SALT_SEPARATOR.len() + data.len());
    input.extend_from_slice(config.salt.as_bytes());
    input.extend_from_slice(SALT_SEPARATOR.as_bytes());
    input.extend_from_slice(data);
    input
}

/// Input of an intermediate step: the previous digest's hex text
pub fn step_input(previous: &Digest) -> Vec<u8> {
    previous.to_hex().into_bytes()
}

/// Input of the final depth-binding step
pub fn binding_input(previous: &Digest, depth: u32) -> Vec<u8> {
    format!("{}{}{}", previous.to_hex(), DEPTH_SEPARATOR, depth).into_bytes()
}

/// Number of base digest applications a config costs
pub fn digest_applications(config: &ChainConfig) -> u32 {
    config.depth + u32::from(config.include_depth_in_hash)
}

/// Run the chain using `digest` as the base primitive.
///
/// Blocking driver; the suspending driver in the service layer uses the same
/// input builders so both produce identical bytes.
pub fn chain_hash_with<F>(data: &[u8], config: &ChainConfig, mut digest: F) -> Result<Digest, IntegrityError>
where
    F: FnMut(&[u8]) -> Result<Digest, IntegrityError>,
{
    config.validate()?;

    let mut current = digest(&seed_input(data, config))?;
    for _ in 1..config.depth {
        current = digest(&step_input(&current))?;
    }

    if config.include_depth_in_hash {
        current = digest(&binding_input(&current, config.depth))?;
    }

    Ok(current)
}
