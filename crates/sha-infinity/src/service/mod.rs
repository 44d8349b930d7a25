//! Service Layer
//!
//! Application services that bind the pure domain logic to the driven
//! ports: a chain engine per digest mode, and the integrity services built
//! on them.

pub mod async_engine;
pub mod async_integrity_service;
pub mod engine;
pub mod integrity_service;

pub use async_engine::{AsyncChainEngine, YIELD_INTERVAL};
pub use async_integrity_service::AsyncIntegrityService;
pub use engine::{ChainEngine, Uncached};
pub use integrity_service::{DocumentVerification, IntegrityService};
