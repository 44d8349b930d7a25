//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the driven ports.
//!
//! ## Adapters
//!
//! - `Sha256Backend` - In-process SHA-256, serves both digest ports
//! - `SystemClock` - Wall clock in UTC
//! - `FixedClock` - Pinned time for reproducible records

pub mod clock;
pub mod sha256;

pub use clock::{FixedClock, SystemClock};
pub use sha256::Sha256Backend;
