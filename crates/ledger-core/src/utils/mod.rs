//! Utility modules for the ledger core

pub mod hashing;
pub mod time;

pub use hashing::{compute_digest, serialize_record, sha256};
pub use time::{now_seconds, to_iso8601};
