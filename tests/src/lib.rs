//! # PoW Ledger Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/      # Cross-crate flows (core + telemetry)
//! │   └── flows.rs
//! ├── exploits/         # Tampering and history-rewrite simulations
//! │   └── tamper.rs
//! └── properties.rs     # proptest invariants over random payloads
//!
//! tests/benches/
//! └── ledger_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ledger-tests
//!
//! # By category
//! cargo test -p ledger-tests integration::
//! cargo test -p ledger-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p ledger-tests
//! ```

pub mod exploits;
pub mod integration;
pub mod properties;

use ledger_core::{Ledger, LedgerConfig};

/// Difficulty used across the suite; keeps sealing to a few dozen digests
pub const TEST_DIFFICULTY: u32 = 1;

/// Build a ledger at `difficulty` holding genesis plus one record per payload
pub fn ledger_with(difficulty: u32, payloads: &[&str]) -> Ledger {
    let mut ledger = Ledger::with_config(&LedgerConfig::with_difficulty(difficulty))
        .expect("genesis seals at test difficulty");
    for payload in payloads {
        ledger.append(*payload).expect("append seals at test difficulty");
    }
    ledger
}
