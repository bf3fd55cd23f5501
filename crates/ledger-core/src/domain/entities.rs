//! Domain value types for the ledger

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Textual marker used as the genesis record's previous digest
pub const GENESIS_SENTINEL: &str = "0";

/// Digest length in bytes (SHA-256)
pub const DIGEST_LEN: usize = 32;

/// Length of a digest rendered as lowercase hex
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// Fixed-length hash of a record's canonical fields
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// All-zero digest
    pub const fn zero() -> Self {
        Self([0u8; DIGEST_LEN])
    }

    /// Parse a 64-character hex string
    pub fn from_hex(value: &str) -> Result<Self> {
        let malformed = || LedgerError::MalformedDigest {
            value: value.to_string(),
        };
        if value.len() != DIGEST_HEX_LEN {
            return Err(malformed());
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| malformed())?;
        Ok(Self(bytes))
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex characters, for display
    pub fn short(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len);
        hex
    }

    /// Number of leading `'0'` symbols in the hex rendering
    pub fn leading_zero_nibbles(&self) -> u32 {
        let mut count = 0;
        for byte in self.0 {
            if byte == 0 {
                count += 2;
                continue;
            }
            if byte >> 4 == 0 {
                count += 1;
            }
            break;
        }
        count
    }

    /// Proof-of-work predicate: at least `difficulty` leading hex zeros
    #[inline]
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.leading_zero_nibbles() >= difficulty
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

/// Link from a record to its predecessor
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PreviousDigest {
    /// Genesis marker, not a valid digest
    Sentinel,
    /// Digest of the preceding record
    Digest(Digest),
}

impl PreviousDigest {
    /// Parse either the sentinel or a 64-character hex digest
    pub fn parse(value: &str) -> Result<Self> {
        if value == GENESIS_SENTINEL {
            return Ok(Self::Sentinel);
        }
        Digest::from_hex(value).map(Self::Digest)
    }

    /// Check for the genesis sentinel
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }

    /// Linked digest, if any
    pub fn digest(&self) -> Option<&Digest> {
        match self {
            Self::Sentinel => None,
            Self::Digest(digest) => Some(digest),
        }
    }

    /// Canonical textual form used by the hasher
    pub fn to_canonical(&self) -> String {
        match self {
            Self::Sentinel => GENESIS_SENTINEL.to_string(),
            Self::Digest(digest) => digest.to_hex(),
        }
    }

    /// Truncated form, for display
    pub fn short(&self, len: usize) -> String {
        match self {
            Self::Sentinel => GENESIS_SENTINEL.to_string(),
            Self::Digest(digest) => digest.short(len),
        }
    }
}

impl From<Digest> for PreviousDigest {
    fn from(digest: Digest) -> Self {
        Self::Digest(digest)
    }
}

impl fmt::Display for PreviousDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl FromStr for PreviousDigest {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PreviousDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical())
    }
}

impl<'de> Deserialize<'de> for PreviousDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Outcome of a successful proof-of-work search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealReport {
    /// Winning nonce
    pub nonce: u64,

    /// Digests computed during the search
    pub attempts: u64,

    /// Wall time spent searching
    pub elapsed: Duration,
}

/// Read-only export view of a record
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordView {
    /// Position in the ledger
    pub index: u64,

    /// Full hex digest
    pub digest: String,

    /// Predecessor digest or the sentinel
    pub previous_digest: String,

    /// ISO-8601 rendering of the creation time
    pub timestamp: String,

    /// Winning nonce
    pub nonce: u64,

    /// Opaque payload
    pub payload: String,
}

/// Summary view of a ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Number of records including genesis
    pub total_records: usize,

    /// Difficulty shared by all records
    pub difficulty: u32,

    /// Digest of the tail record
    pub latest_digest: Option<String>,

    /// Result of a full validation pass
    pub is_valid: bool,
}
