//! # Shared Crypto - Base Digest Primitive
//!
//! SHA-256 wrapped behind a small, fixed contract that the SHA-Infinity
//! engine relies on.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `digest` | SHA-256 | Plain digests, chain steps, Merkle pairs |
//!
//! ## Guarantees
//!
//! - **Determinism**: identical input yields identical bytes on every platform
//! - **Fixed width**: 32 bytes, 64 lowercase hex characters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod digest;
pub mod errors;

// Re-exports
pub use digest::{sha256, sha256_hex, Digest, DIGEST_HEX_LEN, DIGEST_LEN};
pub use errors::CryptoError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
