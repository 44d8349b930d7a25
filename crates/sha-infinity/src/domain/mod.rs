//! Domain Layer - Pure hashing logic
//!
//! This layer contains:
//! - Canonical JSON serialization
//! - The SHA-Infinity chain construction
//! - Merkle aggregation and inclusion proofs
//! - Proof-of-work search
//! - The bounded chain result cache
//! - Integrity records, verification reports and audit links
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - The digest primitive is always supplied by the caller

pub mod cache;
pub mod canonical;
pub mod chain;
pub mod link;
pub mod merkle;
pub mod pow;
pub mod record;

pub use cache::{CacheKey, CacheStats, DigestCache};
pub use canonical::{canonicalize, to_canonical_bytes, to_canonical_json, MAX_NESTING_DEPTH};
pub use chain::{chain_hash_with, digest_applications, ChainHasher};
pub use link::{link_input, link_timestamp, ChainLink};
pub use merkle::{merkle_proof, merkle_root, parse_digests, verify_merkle_proof, MerkleProof, Position, ProofNode};
pub use pow::{proof_of_work, verify_proof_of_work, ProofOfWorkResult, MAX_DIFFICULTY};
pub use record::{detach_integrity, embed_integrity, parse_record, IntegrityRecord, VerificationReport, ALGORITHM_ID, FORMAT_VERSION};
