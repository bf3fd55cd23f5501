//! Ledger aggregate: append-with-seal and full-chain validation

use super::entities::{LedgerSummary, PreviousDigest, RecordView};
use super::record::{ensure_difficulty, Record, SealOptions};
use super::validation::{ChainFault, ValidationReport};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::ports::{LedgerObserver, NoopObserver};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Ordered, append-only sequence of sealed records
///
/// A ledger is single-writer; see [`crate::SharedLedger`] for concurrent use.
pub struct Ledger {
    records: Vec<Record>,
    difficulty: u32,
    max_attempts: Option<u64>,
    observer: Arc<dyn LedgerObserver>,
}

impl Ledger {
    /// Create a ledger with a freshly sealed genesis record
    pub fn new(difficulty: u32) -> Result<Self> {
        Self::with_config(&LedgerConfig::with_difficulty(difficulty))
    }

    /// Create a ledger from configuration
    pub fn with_config(config: &LedgerConfig) -> Result<Self> {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    /// Create a ledger reporting to `observer`
    pub fn with_observer(config: &LedgerConfig, observer: Arc<dyn LedgerObserver>) -> Result<Self> {
        config.validate()?;

        let mut ledger = Self {
            records: Vec::new(),
            difficulty: config.difficulty,
            max_attempts: config.max_attempts,
            observer,
        };

        let genesis = Record::genesis(config.genesis_payload.as_str(), None)?;
        let options = SealOptions {
            max_attempts: config.max_attempts,
            cancel: None,
        };
        ledger.seal_and_push(genesis, &options)?;

        tracing::info!(
            difficulty = ledger.difficulty,
            genesis = %ledger.records[0].digest(),
            "Ledger initialized"
        );
        Ok(ledger)
    }

    /// Rehydrate a ledger from existing records without validating them
    ///
    /// Intended for auditing: run [`Ledger::validate`] on the result.
    pub fn from_records(difficulty: u32, records: Vec<Record>) -> Result<Self> {
        ensure_difficulty(difficulty)?;
        Ok(Self {
            records,
            difficulty,
            max_attempts: None,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Replace the observer
    pub fn attach_observer(&mut self, observer: Arc<dyn LedgerObserver>) {
        self.observer = observer;
    }

    /// Difficulty shared by every record
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Number of records including genesis
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate records in order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Record at `index`
    pub fn get(&self, index: u64) -> Option<&Record> {
        usize::try_from(index)
            .ok()
            .and_then(|position| self.records.get(position))
    }

    /// Last record
    pub fn latest(&self) -> Result<&Record> {
        self.records.last().ok_or(LedgerError::EmptyLedger)
    }

    /// Seal a new record carrying `payload` and append it
    pub fn append(&mut self, payload: impl Into<String>) -> Result<&Record> {
        self.append_with(payload, &SealOptions::default())
    }

    /// Like [`Ledger::append`] with explicit sealing options
    ///
    /// An unset attempt ceiling falls back to the configured one. All-or-nothing:
    /// on any error the ledger is left unchanged.
    pub fn append_with(
        &mut self,
        payload: impl Into<String>,
        options: &SealOptions,
    ) -> Result<&Record> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(LedgerError::EmptyPayload);
        }

        let latest = self.latest()?;
        let index = latest
            .index()
            .checked_add(1)
            .ok_or(LedgerError::IndexOverflow {
                last: latest.index(),
            })?;
        let candidate = Record::new(
            index,
            payload,
            PreviousDigest::Digest(*latest.digest()),
            None,
        )?;

        let options = SealOptions {
            max_attempts: options.max_attempts.or(self.max_attempts),
            cancel: options.cancel.clone(),
        };
        self.seal_and_push(candidate, &options)
    }

    fn seal_and_push(&mut self, mut candidate: Record, options: &SealOptions) -> Result<&Record> {
        let index = candidate.index();
        match candidate.seal_with(self.difficulty, options) {
            Ok(report) => self.observer.on_record_sealed(index, &report),
            Err(err) => {
                tracing::warn!(index, error = %err, "Discarding unsealed candidate");
                self.observer.on_seal_failed(index, &err);
                return Err(err);
            }
        }

        let position = self.records.len();
        self.records.push(candidate);
        let record = &self.records[position];
        self.observer.on_record_appended(record);
        tracing::info!(
            index,
            nonce = record.nonce(),
            digest = %record.digest(),
            "Record appended"
        );
        Ok(record)
    }

    /// Validate the whole chain, stopping at the first failure
    ///
    /// Checks, in order: non-empty, genesis index and sentinel, genesis
    /// integrity and work, then for every following record its integrity,
    /// work, link to the predecessor and index.
    #[tracing::instrument(skip(self), fields(records = self.records.len(), difficulty = self.difficulty))]
    pub fn validate(&self) -> ValidationReport {
        let start = Instant::now();
        let report = self.scan();
        let elapsed = start.elapsed();

        match &report.fault {
            Some(fault) => tracing::warn!(index = ?fault.index(), %fault, "Ledger validation failed"),
            None => tracing::debug!(elapsed_us = elapsed.as_micros() as u64, "Ledger valid"),
        }
        self.observer.on_chain_validated(&report, elapsed);
        report
    }

    /// Shorthand for `validate().is_valid()`
    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    fn scan(&self) -> ValidationReport {
        let Some(genesis) = self.records.first() else {
            return ValidationReport::invalid(0, ChainFault::EmptyLedger);
        };

        if genesis.index() != 0 || !genesis.previous_digest().is_sentinel() {
            return ValidationReport::invalid(
                0,
                ChainFault::InvalidGenesis {
                    index: genesis.index(),
                    previous_digest: *genesis.previous_digest(),
                },
            );
        }
        if let Some(fault) = self.check_sealed(0, genesis) {
            return ValidationReport::invalid(0, fault);
        }

        for (offset, pair) in self.records.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let position = offset + 1;
            let index = position as u64;

            if let Some(fault) = self.check_sealed(index, current) {
                return ValidationReport::invalid(position, fault);
            }
            if current.previous_digest().digest() != Some(previous.digest()) {
                return ValidationReport::invalid(
                    position,
                    ChainFault::BrokenLink {
                        index,
                        expected: *previous.digest(),
                        found: *current.previous_digest(),
                    },
                );
            }
            if current.index() != index {
                return ValidationReport::invalid(
                    position,
                    ChainFault::OutOfSequence {
                        index,
                        found: current.index(),
                    },
                );
            }
        }

        ValidationReport::valid(self.records.len())
    }

    fn check_sealed(&self, index: u64, record: &Record) -> Option<ChainFault> {
        match record.verify_local(self.difficulty) {
            Ok(true) => None,
            Ok(false) => Some(ChainFault::InsufficientWork {
                index,
                difficulty: self.difficulty,
                leading_zeros: record.digest().leading_zero_nibbles(),
            }),
            Err(LedgerError::IntegrityMismatch {
                stored, computed, ..
            }) => Some(ChainFault::IntegrityMismatch {
                index,
                stored,
                computed,
            }),
            Err(err) => Some(ChainFault::Unencodable {
                index,
                reason: err.to_string(),
            }),
        }
    }

    /// Export views of every record
    pub fn views(&self) -> Vec<RecordView> {
        self.records.iter().map(Record::to_view).collect()
    }

    /// Summary view, including a validation pass
    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            total_records: self.records.len(),
            difficulty: self.difficulty,
            latest_digest: self.records.last().map(|r| r.digest().to_hex()),
            is_valid: self.is_valid(),
        }
    }

    /// Mutable access to a sealed record, bypassing the append path
    #[cfg(any(test, feature = "fault-injection"))]
    pub fn record_mut_for_testing(&mut self, index: u64) -> Option<&mut Record> {
        usize::try_from(index)
            .ok()
            .and_then(|position| self.records.get_mut(position))
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records.len())
            .field("difficulty", &self.difficulty)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
