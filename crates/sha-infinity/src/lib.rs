//! # SHA-Infinity
//!
//! Tamper-evidence engine for application state: canonical digests of
//! arbitrary JSON state, a tunable chained hash, Merkle aggregation and a
//! bounded proof-of-work search.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `canonical`: Deterministic JSON text
//!   - `chain`: The chained-hash construction
//!   - `merkle`, `pow`: Aggregation and nonce search over any `ChainHasher`
//!   - `cache`: Bounded LRU of whole-chain results
//!   - `record`, `link`: Records, reports and audit links
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `IntegrityApi` / `AsyncIntegrityApi`: Driving ports
//!   - `DigestBackend` / `AsyncDigestBackend` / `Clock`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `IntegrityService`: Implements `IntegrityApi`
//!   - `AsyncIntegrityService`: Implements `AsyncIntegrityApi`
//!
//! - **Adapters Layer** (`adapters/`): `Sha256Backend`, `SystemClock`, `FixedClock`
//!
//! ## Invariants
//!
//! - Same input, depth and config always produce the same digest, in both
//!   blocking and suspending modes, cached or not
//! - Depth is validated against `[1, 256]` before any digest is computed
//! - `valid == sha256_valid && sha_infinity_valid`
//! - A Merkle root of one digest is that digest
//!
//! ## Usage Example
//!
//! ```ignore
//! use sha_infinity::{EngineConfig, IntegrityApi, IntegrityService};
//! use serde_json::json;
//!
//! let service = IntegrityService::sha256(EngineConfig::default())?;
//! let state = json!({"cards": [{"id": 1, "column": "done"}]});
//!
//! let record = service.create_integrity(&state, None)?;
//! let report = service.verify_integrity(&state, &record)?;
//! assert!(report.valid);
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{FixedClock, Sha256Backend, SystemClock};
pub use config::{ChainConfig, ChainConfigBuilder, EngineConfig, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};
pub use domain::{
    canonicalize, detach_integrity, to_canonical_bytes, to_canonical_json, ChainLink, IntegrityRecord, MerkleProof,
    ProofOfWorkResult, VerificationReport,
};
pub use error::{DepthViolation, IntegrityError};
pub use metrics::{IntegrityMetrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{AsyncDigestBackend, AsyncIntegrityApi, Clock, DigestBackend, IntegrityApi};
pub use service::{AsyncIntegrityService, DocumentVerification, IntegrityService};
pub use shared_crypto::Digest;
