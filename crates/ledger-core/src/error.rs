//! Error types for the ledger core

use crate::domain::Digest;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while constructing, sealing or verifying records
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Difficulty must lie in `1..=64`
    #[error("Invalid difficulty: {difficulty}, must be between 1 and 64")]
    InvalidDifficulty {
        /// Rejected difficulty
        difficulty: u32,
    },

    /// Record payload is empty
    #[error("Payload must be a non-empty string")]
    EmptyPayload,

    /// Previous digest is neither the sentinel nor 64 hex characters
    #[error("Malformed digest {value:?}: expected 64 hex characters or the genesis sentinel")]
    MalformedDigest {
        /// Offending input
        value: String,
    },

    /// The genesis sentinel was used for a non-genesis record
    #[error("Sentinel previous digest is only valid for index 0, got index {index}")]
    SentinelOutsideGenesis {
        /// Index of the offending record
        index: u64,
    },

    /// Timestamp is not a finite, non-negative number of seconds
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp {
        /// Rejected timestamp
        value: f64,
    },

    /// Record index would overflow
    #[error("Index overflow after {last}")]
    IndexOverflow {
        /// Index of the current tail
        last: u64,
    },

    /// Configuration rejected before use
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Proof-of-work search ran out of attempts
    #[error("Mining failed: nonce limit of {max_attempts} exceeded at difficulty {difficulty}")]
    MiningExhausted {
        /// Attempt ceiling that was hit
        max_attempts: u64,
        /// Difficulty being searched for
        difficulty: u32,
    },

    /// Sealing was cancelled by the operator
    #[error("Sealing cancelled after {attempts} attempts")]
    SealCancelled {
        /// Nonces tried before the flag was observed
        attempts: u64,
    },

    /// Stored digest does not match the recomputed one
    #[error("Integrity mismatch at record {index}: stored {stored}, computed {computed}")]
    IntegrityMismatch {
        /// Index of the record
        index: u64,
        /// Digest held by the record
        stored: Digest,
        /// Digest recomputed from the record's fields
        computed: Digest,
    },

    /// Operation needs a tail record but the ledger is empty
    #[error("Ledger is empty, no records available")]
    EmptyLedger,

    /// Record fields could not be canonically encoded
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Coarse error taxonomy
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed arguments or configuration
    Validation,
    /// Proof-of-work bound exceeded
    MiningExhausted,
    /// Sealing aborted through the cancellation flag
    Cancelled,
    /// Stored digest disagrees with recomputation
    Integrity,
    /// No tail record
    EmptyLedger,
    /// Canonical encoding failed
    Encoding,
}

impl LedgerError {
    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDifficulty { .. }
            | Self::EmptyPayload
            | Self::MalformedDigest { .. }
            | Self::SentinelOutsideGenesis { .. }
            | Self::InvalidTimestamp { .. }
            | Self::IndexOverflow { .. }
            | Self::InvalidConfig(_) => ErrorKind::Validation,
            Self::MiningExhausted { .. } => ErrorKind::MiningExhausted,
            Self::SealCancelled { .. } => ErrorKind::Cancelled,
            Self::IntegrityMismatch { .. } => ErrorKind::Integrity,
            Self::EmptyLedger => ErrorKind::EmptyLedger,
            Self::Encoding(_) => ErrorKind::Encoding,
        }
    }

    /// Check if the caller may retry with different parameters
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MiningExhausted { .. } | Self::SealCancelled { .. }
        )
    }

    /// Check if error signals tampering rather than misuse
    pub fn is_tamper_signal(&self) -> bool {
        matches!(self, Self::IntegrityMismatch { .. })
    }
}
