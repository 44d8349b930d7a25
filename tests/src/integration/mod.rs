//! # Integration Tests
//!
//! Exercise the public API of `sha-infinity` the way callers do: through
//! `IntegrityService` / `AsyncIntegrityService` and the port traits.

pub mod flows;
pub mod parity;
pub mod properties;
pub mod vectors;
