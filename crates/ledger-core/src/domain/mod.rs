//! Domain layer - records, the ledger aggregate, and validation results
//!
//! Everything here is synchronous and free of I/O.
//!
//! ## Entities
//!
//! - [`Record`]: one sealed entry, hashed over its canonical encoding
//! - [`Ledger`]: ordered, append-only sequence of records
//! - [`Digest`] / [`PreviousDigest`]: typed SHA-256 values and links
//!
//! ## Invariants
//!
//! 1. Record `i` sits at position `i`; genesis carries the sentinel link
//! 2. Every stored digest equals the recomputation over the record's fields
//! 3. Every digest has at least `difficulty` leading hex zeros
//! 4. Record `i` links to the digest of record `i - 1`

mod entities;
mod ledger;
mod record;
mod validation;

pub use entities::{
    Digest, LedgerSummary, PreviousDigest, RecordView, SealReport, DIGEST_HEX_LEN, DIGEST_LEN,
    GENESIS_SENTINEL,
};
pub use ledger::Ledger;
pub(crate) use record::ensure_difficulty;
pub use record::{Record, SealOptions, CANCEL_CHECK_INTERVAL, MAX_DIFFICULTY};
pub use validation::{ChainFault, CheckKind, ValidationReport};
