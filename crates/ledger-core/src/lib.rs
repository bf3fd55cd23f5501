//! # PoW Ledger - Core
//!
//! A tamper-evident, append-only ledger. Each record commits to its
//! predecessor's digest and carries a proof-of-work seal, so changing any
//! sealed record is detected by a full validation pass.
//!
//! ## Purpose
//!
//! - Hash records over a canonical, key-ordered JSON encoding (SHA-256)
//! - Seal records by searching for a nonce whose digest has `difficulty`
//!   leading hex zeros, under a bounded attempt budget
//! - Append atomically: a record joins the chain only once sealed
//! - Validate the chain and report the first failing record and check
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service                                            │
//! │  - SharedLedger: RwLock handle for many threads     │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Outbound: LedgerObserver (metrics, telemetry)    │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Pure Logic)                                │
//! │  - Record: construct, seal, verify_local            │
//! │  - Ledger: append, validate                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use ledger_core::Ledger;
//!
//! let mut ledger = Ledger::new(1).unwrap();
//! ledger.append("Alice pays Bob 5").unwrap();
//! assert_eq!(ledger.len(), 2);
//! assert!(ledger.validate().is_valid());
//! ```
//!
//! ## Module Structure
//!
//! - [`domain`]: records, the ledger aggregate, validation reports
//! - [`ports`]: observer interface
//! - [`utils`]: canonical hashing and timestamp helpers

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Domain models and business logic
pub mod domain;
/// Outbound interfaces
pub mod ports;
/// Hashing and time helpers
pub mod utils;

mod config;
mod error;
mod metrics;
mod service;

pub use config::{default_max_attempts, LedgerConfig};
pub use error::{ErrorKind, LedgerError, Result};
pub use metrics::{LedgerMetrics, MetricsSnapshot};
pub use service::SharedLedger;

pub use domain::{
    ChainFault, CheckKind, Digest, Ledger, LedgerSummary, PreviousDigest, Record, RecordView,
    SealOptions, SealReport, ValidationReport, GENESIS_SENTINEL, MAX_DIFFICULTY,
};

pub use ports::{CompositeObserver, LedgerObserver, NoopObserver};

/// Default leading hex zeros required of a digest
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Payload sealed into the genesis record when none is configured
pub const DEFAULT_GENESIS_PAYLOAD: &str = "Genesis Block";

/// Attempt budget granted per unit of difficulty
pub const ATTEMPTS_PER_DIFFICULTY: u64 = 5_000_000;

/// Floor of the default attempt budget
pub const MIN_MAX_ATTEMPTS: u64 = 10_000_000;
