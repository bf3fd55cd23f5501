//! Metrics collection for the ledger

use crate::domain::{Record, SealReport, ValidationReport};
use crate::error::LedgerError;
use crate::ports::LedgerObserver;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lock-free counters fed through [`LedgerObserver`]
#[derive(Debug, Default)]
pub struct LedgerMetrics {
    /// Records sealed successfully
    pub records_sealed: AtomicU64,

    /// Records appended to the chain
    pub records_appended: AtomicU64,

    /// Sealing attempts that exhausted or were cancelled
    pub seal_failures: AtomicU64,

    /// Nonces tried across successful seals
    pub nonce_attempts: AtomicU64,

    /// Total mining time (microseconds)
    pub mining_time_us: AtomicU64,

    /// Slowest single seal (microseconds)
    pub max_mining_time_us: AtomicU64,

    /// Validation passes run
    pub validations: AtomicU64,

    /// Validation passes that found a fault
    pub validation_failures: AtomicU64,

    /// Total validation time (microseconds)
    pub validation_time_us: AtomicU64,
}

/// Point-in-time copy of [`LedgerMetrics`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Records sealed successfully
    pub records_sealed: u64,
    /// Records appended to the chain
    pub records_appended: u64,
    /// Failed seals
    pub seal_failures: u64,
    /// Mean nonces per successful seal
    pub avg_attempts_per_seal: f64,
    /// Mean seal time in milliseconds
    pub avg_mining_time_ms: f64,
    /// Slowest seal in milliseconds
    pub max_mining_time_ms: f64,
    /// Validation passes run
    pub validations: u64,
    /// Validation passes that found a fault
    pub validation_failures: u64,
    /// Mean validation time in milliseconds
    pub avg_validation_time_ms: f64,
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

fn ratio(total: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total as f64 / count as f64
}

impl LedgerMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful seal
    pub fn record_seal(&self, attempts: u64, elapsed: Duration) {
        let elapsed_us = micros(elapsed);
        self.records_sealed.fetch_add(1, Ordering::Relaxed);
        self.nonce_attempts.fetch_add(attempts, Ordering::Relaxed);
        self.mining_time_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.max_mining_time_us
            .fetch_max(elapsed_us, Ordering::Relaxed);
    }

    /// Record a failed seal
    pub fn record_seal_failure(&self) {
        self.seal_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a validation pass
    pub fn record_validation(&self, valid: bool, elapsed: Duration) {
        self.validations.fetch_add(1, Ordering::Relaxed);
        if !valid {
            self.validation_failures.fetch_add(1, Ordering::Relaxed);
        }
        self.validation_time_us
            .fetch_add(micros(elapsed), Ordering::Relaxed);
    }

    /// Get records sealed
    pub fn get_records_sealed(&self) -> u64 {
        self.records_sealed.load(Ordering::Relaxed)
    }

    /// Get average nonces tried per seal
    pub fn get_avg_attempts_per_seal(&self) -> f64 {
        ratio(
            self.nonce_attempts.load(Ordering::Relaxed),
            self.get_records_sealed(),
        )
    }

    /// Get average mining time (milliseconds)
    pub fn get_avg_mining_time_ms(&self) -> f64 {
        ratio(
            self.mining_time_us.load(Ordering::Relaxed),
            self.get_records_sealed(),
        ) / 1000.0
    }

    /// Get average validation time (milliseconds)
    pub fn get_avg_validation_time_ms(&self) -> f64 {
        ratio(
            self.validation_time_us.load(Ordering::Relaxed),
            self.validations.load(Ordering::Relaxed),
        ) / 1000.0
    }

    /// Copy the current values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_sealed: self.get_records_sealed(),
            records_appended: self.records_appended.load(Ordering::Relaxed),
            seal_failures: self.seal_failures.load(Ordering::Relaxed),
            avg_attempts_per_seal: self.get_avg_attempts_per_seal(),
            avg_mining_time_ms: self.get_avg_mining_time_ms(),
            max_mining_time_ms: self.max_mining_time_us.load(Ordering::Relaxed) as f64 / 1000.0,
            validations: self.validations.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            avg_validation_time_ms: self.get_avg_validation_time_ms(),
        }
    }
}

impl LedgerObserver for LedgerMetrics {
    fn on_record_sealed(&self, _index: u64, report: &SealReport) {
        self.record_seal(report.attempts, report.elapsed);
    }

    fn on_seal_failed(&self, _index: u64, _error: &LedgerError) {
        self.record_seal_failure();
    }

    fn on_record_appended(&self, _record: &Record) {
        self.records_appended.fetch_add(1, Ordering::Relaxed);
    }

    fn on_chain_validated(&self, report: &ValidationReport, elapsed: Duration) {
        self.record_validation(report.is_valid(), elapsed);
    }
}
