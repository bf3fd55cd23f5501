//! Thread-safe ledger handle
//!
//! The write lock is held for the whole of an append, sealing included, so
//! two appends can never link to the same predecessor. Readers block while
//! a record is being mined.

use crate::config::LedgerConfig;
use crate::domain::{Ledger, LedgerSummary, Record, RecordView, SealOptions, ValidationReport};
use crate::error::Result;
use crate::ports::LedgerObserver;
use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cloneable handle sharing one [`Ledger`] between threads
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    /// Wrap an existing ledger
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Build a ledger from configuration and wrap it
    pub fn with_observer(config: &LedgerConfig, observer: Arc<dyn LedgerObserver>) -> Result<Self> {
        Ledger::with_observer(config, observer).map(Self::new)
    }

    /// Seal and append a record, returning a copy of it
    #[instrument(skip(self, payload))]
    pub fn append(&self, payload: impl Into<String>) -> Result<Record> {
        let mut ledger = self.inner.write();
        ledger.append(payload).cloned()
    }

    /// Append with a cancellation flag the caller can raise from another thread
    pub fn append_cancellable(
        &self,
        payload: impl Into<String>,
        cancel: Arc<AtomicBool>,
    ) -> Result<Record> {
        let options = SealOptions::default().with_cancel_flag(cancel);
        self.append_with(payload, &options)
    }

    /// Append with explicit sealing options
    pub fn append_with(&self, payload: impl Into<String>, options: &SealOptions) -> Result<Record> {
        let mut ledger = self.inner.write();
        let record = ledger.append_with(payload, options).cloned()?;
        debug!(index = record.index(), "Shared append complete");
        Ok(record)
    }

    /// Validate under a read lock
    pub fn validate(&self) -> ValidationReport {
        self.inner.read().validate()
    }

    /// Copy of the latest record
    pub fn latest(&self) -> Result<Record> {
        self.inner.read().latest().cloned()
    }

    /// Summary view
    pub fn summary(&self) -> LedgerSummary {
        self.inner.read().summary()
    }

    /// Views of every record
    pub fn views(&self) -> Vec<RecordView> {
        self.inner.read().views()
    }

    /// Copy of every record
    pub fn snapshot(&self) -> Vec<Record> {
        self.inner.read().records().to_vec()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True when there are no records
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` with exclusive access to the ledger
    pub fn with_ledger_mut<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> T {
        f(&mut self.inner.write())
    }
}
