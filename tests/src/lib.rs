//! # SHA-Infinity Test Suite
//!
//! Cross-crate tests for the integrity engine.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── vectors.rs      # Fixed digests that must never change
//!     ├── flows.rs        # Seal, tamper, audit-trail and cache flows
//!     ├── parity.rs       # Blocking vs suspending services
//!     └── properties.rs   # proptest invariants
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p si-tests
//!
//! # By category
//! cargo test -p si-tests integration::parity::
//!
//! # Benchmarks
//! cargo bench -p si-tests
//! ```

pub mod integration;
