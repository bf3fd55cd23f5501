//! # Ledger Node
//!
//! Demonstration driver for the PoW ledger.
//!
//! ## Run Sequence
//!
//! 1. Load configuration from the environment and install logging
//! 2. Create the ledger (genesis is sealed immediately)
//! 3. Seal the sample transactions, validating after each one
//! 4. Print the chain
//! 5. Tamper with one record and show that validation catches it
//! 6. Print the summary and metrics as JSON

mod attack;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use ledger_core::{CompositeObserver, LedgerMetrics, Record, SharedLedger};
use ledger_telemetry::{init_logging, log_record_event, PrometheusObserver, TelemetryConfig};
use prometheus::Registry;
use tracing::{debug, error, info, warn};

use crate::attack::{simulate_attack, FORGED_PAYLOAD};
use crate::config::NodeConfig;

const TRANSACTIONS: [&str; 3] = [
    "Transaction 1: Jorge pays Vale 115 XRP",
    "Transaction 2: Vale pays Zero 45 XRP",
    "Transaction 3: Zero pays Jorge 78 XRP",
];

/// Result of re-verifying a record after it was appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SealCheck {
    Sealed,
    Unsealed,
    Tampered,
    Unverifiable,
}

fn check_seal(record: &Record, difficulty: u32) -> SealCheck {
    match record.verify_local(difficulty) {
        Ok(true) => SealCheck::Sealed,
        Ok(false) => SealCheck::Unsealed,
        Err(err) if err.is_tamper_signal() => {
            warn!(
                index = record.index(),
                error = %err,
                "Record digest does not match its contents"
            );
            SealCheck::Tampered
        }
        Err(err) => {
            error!(
                index = record.index(),
                error = %err,
                "Record could not be verified"
            );
            SealCheck::Unverifiable
        }
    }
}

fn append_transactions(shared: &SharedLedger, difficulty: u32) {
    for (n, payload) in TRANSACTIONS.iter().enumerate() {
        info!(transaction = n + 1, "Mining record");
        match shared.append(*payload) {
            Ok(record) => {
                log_record_event!(
                    info,
                    "Record mined",
                    record.index(),
                    record.digest(),
                    nonce = record.nonce()
                );
                let seal = check_seal(&record, difficulty);
                let chain_valid = shared.validate().is_valid();
                info!(index = record.index(), seal = ?seal, chain_valid, "Post-append check");
            }
            Err(err) => error!(
                transaction = n + 1,
                error = %err,
                recoverable = err.is_recoverable(),
                "Failed to append transaction"
            ),
        }
    }
}

fn print_chain(shared: &SharedLedger) {
    println!("==== Ledger ====");
    for record in shared.snapshot() {
        println!("{record}");
    }
}

fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_logging(&telemetry).context("failed to initialise logging")?;

    let config = NodeConfig::from_env();
    config
        .ledger
        .validate()
        .context("invalid ledger configuration")?;

    let metrics = Arc::new(LedgerMetrics::new());
    let registry = Registry::new();
    let prometheus = Arc::new(
        PrometheusObserver::register(&registry).context("failed to register metrics")?,
    );
    let observer = CompositeObserver::new()
        .add_observer(metrics.clone())
        .add_observer(prometheus.clone());

    let shared = SharedLedger::with_observer(&config.ledger, Arc::new(observer))
        .context("failed to seal the genesis record")?;
    info!(
        records = shared.len(),
        difficulty = config.ledger.difficulty,
        "Ledger initialized"
    );

    append_transactions(&shared, config.ledger.difficulty);
    print_chain(&shared);

    if config.simulate_attack {
        match simulate_attack(&shared, config.attack_target, FORGED_PAYLOAD)
            .context("attack simulation failed")?
        {
            Some(outcome) => {
                if outcome.detected {
                    info!(
                        index = ?outcome.failed_index,
                        check = ?outcome.failed_check,
                        "Tampering detected: stored digest does not match recomputation"
                    );
                } else {
                    warn!(index = outcome.target, "Tampering went undetected");
                }
                print_chain(&shared);
                println!("==== Attack Analysis ====");
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            None => warn!(
                target_index = config.attack_target,
                "Attack skipped: target record does not exist"
            ),
        }
    }

    let report = serde_json::json!({
        "summary": shared.summary(),
        "metrics": metrics.snapshot(),
    });
    println!("==== Final Summary ====");
    println!("{}", serde_json::to_string_pretty(&report)?);

    debug!(exposition = %prometheus.render()?, "Prometheus metrics");
    Ok(())
}
