//! # Proof-of-Work Search
//!
//! Bounded nonce search for a chained hash whose hex text starts with
//! `difficulty` zeros.
//!
//! Each attempt hashes `data ":" nonce` with the depth binding switched off.
//! Running out of attempts is a normal outcome (`verified = false`), not an
//! error.

use serde::{Deserialize, Serialize};
use shared_crypto::{Digest, DIGEST_HEX_LEN};

use crate::config::ChainConfig;
use crate::domain::chain::ChainHasher;
use crate::error::IntegrityError;

/// Separator between data and nonce
pub const NONCE_SEPARATOR: &str = ":";

/// Highest difficulty a 64-character digest can satisfy
pub const MAX_DIFFICULTY: usize = DIGEST_HEX_LEN;

/// Outcome of a proof-of-work search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfWorkResult {
    /// Last computed digest
    pub hash: Digest,
    /// Satisfying nonce, or the last nonce tried
    pub nonce: u64,
    /// Digests computed
    pub attempts: u64,
    /// Whether `hash` meets the difficulty
    pub verified: bool,
}

/// Reject difficulties no digest can meet
pub fn validate_difficulty(difficulty: usize) -> Result<(), IntegrityError> {
    if difficulty > MAX_DIFFICULTY {
        return Err(IntegrityError::InvalidDifficulty {
            difficulty,
            max: MAX_DIFFICULTY,
        });
    }
    Ok(())
}

/// Validate every search parameter before the first attempt
pub fn validate_search(
    difficulty: usize,
    config: &ChainConfig,
    max_attempts: u64,
) -> Result<(), IntegrityError> {
    validate_difficulty(difficulty)?;
    config.validate()?;

    if max_attempts == 0 {
        return Err(IntegrityError::InvalidConfig(
            "max_attempts cannot be 0".to_string(),
        ));
    }
    Ok(())
}

/// Config used for every attempt: same chain, no depth binding
pub fn search_config(config: &ChainConfig) -> ChainConfig {
    config.clone().with_depth_binding(false)
}

/// Input hashed for `nonce`
pub fn attempt_input(data: &[u8], nonce: u64) -> Vec<u8> {
    let nonce = nonce.to_string();
    let mut input = Vec::with_capacity(data.len() + NONCE_SEPARATOR.len() + nonce.len());
    input.extend_from_slice(data);
    input.extend_from_slice(NONCE_SEPARATOR.as_bytes());
    input.extend_from_slice(nonce.as_bytes());
    input
}

/// Search nonces `0..max_attempts` in order
pub fn proof_of_work<H>(
    hasher: &H,
    data: &[u8],
    difficulty: usize,
    config: &ChainConfig,
    max_attempts: u64,
) -> Result<ProofOfWorkResult, IntegrityError>
where
    H: ChainHasher + ?Sized,
{
    validate_search(difficulty, config, max_attempts)?;

    let config = search_config(config);
    let mut nonce = 0u64;
    let mut attempts = 0u64;

    loop {
        let hash = hasher.chain_hash(&attempt_input(data, nonce), &config)?;
        attempts += 1;

        if hash.meets_difficulty(difficulty) {
            return Ok(ProofOfWorkResult {
                hash,
                nonce,
                attempts,
                verified: true,
            });
        }

        if attempts >= max_attempts {
            return Ok(ProofOfWorkResult {
                hash,
                nonce,
                attempts,
                verified: false,
            });
        }

        nonce += 1;
    }
}

/// Recompute a single attempt and check it meets `difficulty`
pub fn verify_proof_of_work<H>(
    hasher: &H,
    data: &[u8],
    nonce: u64,
    difficulty: usize,
    config: &ChainConfig,
) -> Result<bool, IntegrityError>
where
    H: ChainHasher + ?Sized,
{
    validate_difficulty(difficulty)?;
    config.validate()?;

    let hash = hasher.chain_hash(&attempt_input(data, nonce), &search_config(config))?;
    Ok(hash.meets_difficulty(difficulty))
}
