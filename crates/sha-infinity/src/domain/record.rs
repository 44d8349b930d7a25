//! Integrity records and verification reports
//!
//! A record pairs the plain SHA-256 of a state's canonical form with its
//! SHA-Infinity digest. Records are created once and never mutated;
//! verification produces a separate report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_crypto::Digest;

use crate::error::IntegrityError;

/// Record format written by this engine
pub const FORMAT_VERSION: &str = "1.0.0";

/// Algorithm identifier written by this engine
pub const ALGORITHM_ID: &str = "sha-infinity-v1";

/// Field under which state files embed their own record
pub const EMBEDDED_RECORD_FIELD: &str = "integrity";

/// Object that may carry the embedded record instead of the top level
pub const METADATA_FIELD: &str = "metadata";

/// Tamper-evidence record for one state snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityRecord {
    #[serde(rename = "sha256")]
    pub plain_digest: Digest,
    #[serde(rename = "sha_infinity")]
    pub chained_digest: Digest,
    pub chain_depth: u32,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "version")]
    pub format_version: String,
    #[serde(rename = "algorithm")]
    pub algorithm_id: String,
}

impl IntegrityRecord {
    /// Assemble a record in the current format
    pub fn new(plain_digest: Digest, chained_digest: Digest, chain_depth: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            plain_digest,
            chained_digest,
            chain_depth,
            created_at,
            format_version: FORMAT_VERSION.to_string(),
            algorithm_id: ALGORITHM_ID.to_string(),
        }
    }

    /// Whether this engine knows how to recompute the record
    pub fn is_recognized(&self) -> bool {
        self.algorithm_id == ALGORITHM_ID
    }
}

/// Result of checking a state against a record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub valid: bool,
    pub sha256_valid: bool,
    pub sha_infinity_valid: bool,
    pub checked_at: DateTime<Utc>,
    pub original_timestamp: DateTime<Utc>,
    pub algorithm_recognized: bool,
    /// SHA-256 of the state as checked
    pub computed_sha256: Digest,
    /// SHA-Infinity of the state as checked; unset when the record's
    /// parameters could not be used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_sha_infinity: Option<Digest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerificationReport {
    /// Compare recomputed digests against `record`.
    ///
    /// `chained` is `Err(reason)` when the chained digest could not be
    /// recomputed from the record's parameters.
    pub fn compare(
        record: &IntegrityRecord,
        plain: &Digest,
        chained: Result<Digest, String>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let sha256_valid = *plain == record.plain_digest;
        let (computed_sha_infinity, reason) = match chained {
            Ok(digest) => (Some(digest), None),
            Err(reason) => (None, Some(reason)),
        };
        let sha_infinity_valid = computed_sha_infinity == Some(record.chained_digest);

        Self {
            valid: sha256_valid && sha_infinity_valid,
            sha256_valid,
            sha_infinity_valid,
            checked_at,
            original_timestamp: record.created_at,
            algorithm_recognized: true,
            computed_sha256: *plain,
            computed_sha_infinity,
            reason,
        }
    }

    /// Report for a record written by an unknown algorithm.
    ///
    /// Only the plain digest is reported; the chain parameters of an
    /// unknown algorithm are not trusted.
    pub fn unrecognized(record: &IntegrityRecord, plain: &Digest, checked_at: DateTime<Utc>) -> Self {
        Self {
            valid: false,
            sha256_valid: false,
            sha_infinity_valid: false,
            checked_at,
            original_timestamp: record.created_at,
            algorithm_recognized: false,
            computed_sha256: *plain,
            computed_sha_infinity: None,
            reason: Some(format!(
                "unrecognized algorithm {:?} (version {:?})",
                record.algorithm_id, record.format_version
            )),
        }
    }
}

/// Split a state document into its content and an embedded record.
///
/// The record is looked up at the top-level `integrity` field, then at
/// `metadata.integrity`. Both locations are stripped from the returned
/// content so the digest never covers the record itself.
pub fn detach_integrity(state: &Value) -> (Value, Option<Value>) {
    let mut content = state.clone();
    let record = match &mut content {
        Value::Object(map) => {
            let top_level = map.remove(EMBEDDED_RECORD_FIELD);
            let nested = match map.get_mut(METADATA_FIELD) {
                Some(Value::Object(metadata)) => metadata.remove(EMBEDDED_RECORD_FIELD),
                _ => None,
            };
            top_level.or(nested)
        }
        _ => None,
    };

    (content, record)
}

/// Attach `record` to `content` under the top-level `integrity` field.
///
/// Any record already embedded (at either location) is replaced.
pub fn embed_integrity(content: &Value, record: &IntegrityRecord) -> Result<Value, IntegrityError> {
    let (mut sealed, _) = detach_integrity(content);
    let Value::Object(map) = &mut sealed else {
        return Err(IntegrityError::Serialization(
            "only JSON objects can carry an embedded record".to_string(),
        ));
    };

    map.insert(EMBEDDED_RECORD_FIELD.to_string(), serde_json::to_value(record)?);
    Ok(sealed)
}

/// Parse an embedded record value
pub fn parse_record(value: &Value) -> Result<IntegrityRecord, IntegrityError> {
    Ok(IntegrityRecord::deserialize(value)?)
}
