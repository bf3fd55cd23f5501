//! Chain validation report
//!
//! Tamper detection is an expected outcome, so a failed validation is a
//! value rather than an error.

use super::entities::{Digest, PreviousDigest};
use serde::Serialize;
use std::fmt;

/// Which check failed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Ledger has no records
    NonEmpty,
    /// Genesis index or sentinel
    Genesis,
    /// Stored digest vs recomputation
    Integrity,
    /// Proof-of-work predicate
    ProofOfWork,
    /// previous_digest vs predecessor's digest
    Linkage,
    /// index vs position
    Sequence,
}

impl CheckKind {
    /// Stable lowercase name, used as a metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonEmpty => "non_empty",
            Self::Genesis => "genesis",
            Self::Integrity => "integrity",
            Self::ProofOfWork => "proof_of_work",
            Self::Linkage => "linkage",
            Self::Sequence => "sequence",
        }
    }
}

/// First failure found while scanning a ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "fault", rename_all = "snake_case")]
pub enum ChainFault {
    /// No records to validate
    EmptyLedger,

    /// Genesis record is not at index 0 or does not carry the sentinel
    InvalidGenesis {
        /// Index stored in the first record
        index: u64,
        /// Link stored in the first record
        previous_digest: PreviousDigest,
    },

    /// Stored digest differs from the recomputed one
    IntegrityMismatch {
        /// Failing position
        index: u64,
        /// Digest held by the record
        stored: Digest,
        /// Digest recomputed from the record's fields
        computed: Digest,
    },

    /// Digest does not have enough leading hex zeros
    InsufficientWork {
        /// Failing position
        index: u64,
        /// Required leading zeros
        difficulty: u32,
        /// Leading zeros actually present
        leading_zeros: u32,
    },

    /// previous_digest does not match the predecessor's digest
    BrokenLink {
        /// Failing position
        index: u64,
        /// Predecessor's digest
        expected: Digest,
        /// Link stored in the record
        found: PreviousDigest,
    },

    /// Record index does not match its position
    OutOfSequence {
        /// Position in the ledger
        index: u64,
        /// Index stored in the record
        found: u64,
    },

    /// Record fields could not be re-encoded for hashing
    Unencodable {
        /// Failing position
        index: u64,
        /// Encoder message
        reason: String,
    },
}

impl ChainFault {
    /// Position of the failing record, if any
    pub fn index(&self) -> Option<u64> {
        match self {
            Self::EmptyLedger => None,
            Self::InvalidGenesis { .. } => Some(0),
            Self::IntegrityMismatch { index, .. }
            | Self::InsufficientWork { index, .. }
            | Self::BrokenLink { index, .. }
            | Self::OutOfSequence { index, .. }
            | Self::Unencodable { index, .. } => Some(*index),
        }
    }

    /// Check that produced this fault
    pub fn check(&self) -> CheckKind {
        match self {
            Self::EmptyLedger => CheckKind::NonEmpty,
            Self::InvalidGenesis { .. } => CheckKind::Genesis,
            Self::IntegrityMismatch { .. } | Self::Unencodable { .. } => CheckKind::Integrity,
            Self::InsufficientWork { .. } => CheckKind::ProofOfWork,
            Self::BrokenLink { .. } => CheckKind::Linkage,
            Self::OutOfSequence { .. } => CheckKind::Sequence,
        }
    }
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLedger => write!(f, "ledger is empty"),
            Self::InvalidGenesis {
                index,
                previous_digest,
            } => write!(
                f,
                "genesis record is invalid (index={index}, previous_digest={previous_digest})"
            ),
            Self::IntegrityMismatch {
                index,
                stored,
                computed,
            } => write!(
                f,
                "invalid digest at record {index}: stored {stored}, computed {computed}"
            ),
            Self::InsufficientWork {
                index,
                difficulty,
                leading_zeros,
            } => write!(
                f,
                "record {index} does not meet difficulty {difficulty} ({leading_zeros} leading zeros)"
            ),
            Self::BrokenLink { index, .. } => {
                write!(f, "invalid previous digest at record {index}")
            }
            Self::OutOfSequence { index, found } => {
                write!(f, "record at position {index} carries index {found}")
            }
            Self::Unencodable { index, reason } => {
                write!(f, "record {index} cannot be encoded: {reason}")
            }
        }
    }
}

/// Result of a full-chain validation pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Records that passed every check before the scan stopped
    pub records_checked: usize,

    /// First failure, `None` when the chain is valid
    pub fault: Option<ChainFault>,
}

impl ValidationReport {
    /// Report for a chain that passed every check
    pub fn valid(records_checked: usize) -> Self {
        Self {
            records_checked,
            fault: None,
        }
    }

    /// Report for a chain that failed at `fault`
    pub fn invalid(records_checked: usize, fault: ChainFault) -> Self {
        Self {
            records_checked,
            fault: Some(fault),
        }
    }

    /// True when no check failed
    pub fn is_valid(&self) -> bool {
        self.fault.is_none()
    }

    /// Position of the first failing record
    pub fn failed_index(&self) -> Option<u64> {
        self.fault.as_ref().and_then(ChainFault::index)
    }

    /// Check that failed first
    pub fn failed_check(&self) -> Option<CheckKind> {
        self.fault.as_ref().map(ChainFault::check)
    }
}
