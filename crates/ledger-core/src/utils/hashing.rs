//! Hashing utilities for record sealing
//!
//! The digest of a record is SHA-256 over a canonical JSON object whose keys
//! are emitted in a fixed (alphabetical) order:
//!
//! ```text
//! {"index":1,"nonce":42,"payload":"A","previous_digest":"00ab..","timestamp":1700000000.25}
//! ```
//!
//! The genesis sentinel is encoded as the string `"0"`.

use crate::domain::{Digest, PreviousDigest, DIGEST_LEN};
use crate::error::{LedgerError, Result};
use serde::Serialize;
use sha2::{Digest as _, Sha256};

/// Canonical field layout hashed for every record
#[derive(Serialize)]
struct CanonicalRecord<'a> {
    index: u64,
    nonce: u64,
    payload: &'a str,
    previous_digest: &'a str,
    timestamp: f64,
}

/// Compute SHA-256 hash of data
#[inline]
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Serialize record fields for hashing
///
/// Fails if the timestamp is not finite, since JSON has no representation
/// for NaN or infinities.
pub fn serialize_record(
    index: u64,
    timestamp: f64,
    payload: &str,
    previous_digest: &PreviousDigest,
    nonce: u64,
) -> Result<Vec<u8>> {
    if !timestamp.is_finite() {
        return Err(LedgerError::Encoding(format!(
            "timestamp {timestamp} has no canonical encoding"
        )));
    }

    // Adding zero folds -0.0 into 0.0 so both serialize alike
    let timestamp = timestamp + 0.0;
    let previous = previous_digest.to_canonical();
    let canonical = CanonicalRecord {
        index,
        nonce,
        payload,
        previous_digest: &previous,
        timestamp,
    };

    serde_json::to_vec(&canonical).map_err(|e| LedgerError::Encoding(e.to_string()))
}

/// Compute the digest of a record's canonical fields
///
/// Pure and deterministic; safe to call from observers measuring hash cost.
pub fn compute_digest(
    index: u64,
    timestamp: f64,
    payload: &str,
    previous_digest: &PreviousDigest,
    nonce: u64,
) -> Result<Digest> {
    let bytes = serialize_record(index, timestamp, payload, previous_digest, nonce)?;
    Ok(Digest::from_bytes(sha256(&bytes)))
}
