//! Outbound ports: observers notified by the ledger
//!
//! Observers are passed explicitly at construction; the core holds no
//! process-wide collector. All hooks default to no-ops.

use crate::domain::{Record, SealReport, ValidationReport};
use crate::error::LedgerError;
use std::sync::Arc;
use std::time::Duration;

/// Observability sink for ledger operations
pub trait LedgerObserver: Send + Sync {
    /// A candidate record at `index` was sealed
    fn on_record_sealed(&self, _index: u64, _report: &SealReport) {}

    /// Sealing the candidate at `index` failed; the candidate was discarded
    fn on_seal_failed(&self, _index: u64, _error: &LedgerError) {}

    /// A sealed record became part of the chain
    fn on_record_appended(&self, _record: &Record) {}

    /// A full validation pass finished
    fn on_chain_validated(&self, _report: &ValidationReport, _elapsed: Duration) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LedgerObserver for NoopObserver {}

/// Fan-out to several observers, in registration order
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LedgerObserver>>,
}

impl CompositeObserver {
    /// Creates an empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer to the chain
    pub fn add_observer(mut self, observer: Arc<dyn LedgerObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl LedgerObserver for CompositeObserver {
    fn on_record_sealed(&self, index: u64, report: &SealReport) {
        for observer in &self.observers {
            observer.on_record_sealed(index, report);
        }
    }

    fn on_seal_failed(&self, index: u64, error: &LedgerError) {
        for observer in &self.observers {
            observer.on_seal_failed(index, error);
        }
    }

    fn on_record_appended(&self, record: &Record) {
        for observer in &self.observers {
            observer.on_record_appended(record);
        }
    }

    fn on_chain_validated(&self, report: &ValidationReport, elapsed: Duration) {
        for observer in &self.observers {
            observer.on_chain_validated(report, elapsed);
        }
    }
}
