//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports (outbound) - Digest primitive and clock

pub mod inbound;
pub mod outbound;

pub use inbound::{AsyncIntegrityApi, IntegrityApi};
pub use outbound::{AsyncDigestBackend, Clock, DigestBackend};
