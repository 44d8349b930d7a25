//! Chain-of-custody links for append-only audit trails
//!
//! Each link binds the previous link's digest, new data and a timestamp:
//! `chain_hash(hex(previous) ":" data ":" timestamp)`. The timestamp is kept
//! on the link so auditors can re-derive it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use shared_crypto::Digest;

/// Separator between link components
pub const LINK_SEPARATOR: &str = ":";

/// One link in an audit trail
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub hash: Digest,
    pub previous: Digest,
    pub timestamp: DateTime<Utc>,
}

/// Timestamp text bound into a link (RFC 3339, millisecond precision, `Z`)
pub fn link_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Input hashed to produce a link
pub fn link_input(previous: &Digest, data: &[u8], timestamp: &DateTime<Utc>) -> Vec<u8> {
    let mut input = previous.to_hex().into_bytes();
    input.extend_from_slice(LINK_SEPARATOR.as_bytes());
    input.extend_from_slice(data);
    input.extend_from_slice(LINK_SEPARATOR.as_bytes());
    input.extend_from_slice(link_timestamp(timestamp).as_bytes());
    input
}
