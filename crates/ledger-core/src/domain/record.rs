//! Record entity: construction, proof-of-work sealing, local verification

use super::entities::{Digest, PreviousDigest, RecordView, SealReport, DIGEST_HEX_LEN};
use crate::config::default_max_attempts;
use crate::error::{LedgerError, Result};
use crate::utils::{compute_digest, now_seconds, to_iso8601};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Nonces searched between polls of the cancellation flag
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Highest difficulty a 64-character hex digest can satisfy
pub const MAX_DIFFICULTY: u32 = DIGEST_HEX_LEN as u32;

/// Characters of a digest shown by `Display`
const SHORT_DIGEST_LEN: usize = 10;

/// Per-call sealing parameters
#[derive(Clone, Debug, Default)]
pub struct SealOptions {
    /// Attempt ceiling; `None` uses [`default_max_attempts`]
    pub max_attempts: Option<u64>,

    /// Cooperative cancellation flag, polled between nonces
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SealOptions {
    /// Override the attempt ceiling
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Attach a cancellation flag
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    fn attempt_ceiling(&self, difficulty: u32) -> Result<u64> {
        match self.max_attempts {
            Some(0) => Err(LedgerError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            )),
            Some(limit) => Ok(limit),
            None => Ok(default_max_attempts(difficulty)),
        }
    }
}

pub(crate) fn ensure_difficulty(difficulty: u32) -> Result<()> {
    if difficulty == 0 || difficulty > MAX_DIFFICULTY {
        return Err(LedgerError::InvalidDifficulty { difficulty });
    }
    Ok(())
}

/// A hash-sealed unit of the ledger
///
/// The digest is always a function of the other fields: it is computed at
/// construction and only replaced together with the nonce that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    index: u64,
    timestamp: f64,
    payload: String,
    previous_digest: PreviousDigest,
    nonce: u64,
    digest: Digest,
}

impl Record {
    /// Create an unsealed record
    ///
    /// `timestamp` defaults to the current wall clock.
    pub fn new(
        index: u64,
        payload: impl Into<String>,
        previous_digest: PreviousDigest,
        timestamp: Option<f64>,
    ) -> Result<Self> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(LedgerError::EmptyPayload);
        }
        if previous_digest.is_sentinel() && index != 0 {
            return Err(LedgerError::SentinelOutsideGenesis { index });
        }
        let timestamp = match timestamp {
            Some(value) if !value.is_finite() || value < 0.0 => {
                return Err(LedgerError::InvalidTimestamp { value })
            }
            // Adding zero folds -0.0 into 0.0
            Some(value) => value + 0.0,
            None => now_seconds(),
        };

        let digest = compute_digest(index, timestamp, &payload, &previous_digest, 0)?;

        Ok(Self {
            index,
            timestamp,
            payload,
            previous_digest,
            nonce: 0,
            digest,
        })
    }

    /// Create an unsealed genesis record
    pub fn genesis(payload: impl Into<String>, timestamp: Option<f64>) -> Result<Self> {
        Self::new(0, payload, PreviousDigest::Sentinel, timestamp)
    }

    /// Parse a textual previous digest and create an unsealed record
    pub fn from_parts(
        index: u64,
        payload: impl Into<String>,
        previous_digest: &str,
        timestamp: Option<f64>,
    ) -> Result<Self> {
        let previous_digest = PreviousDigest::parse(previous_digest)?;
        Self::new(index, payload, previous_digest, timestamp)
    }

    /// Position in the ledger
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Creation time in fractional seconds
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Opaque payload
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Link to the predecessor
    pub fn previous_digest(&self) -> &PreviousDigest {
        &self.previous_digest
    }

    /// Current nonce
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Stored digest
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Check for the genesis position
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Recompute the digest from the current fields
    pub fn recompute_digest(&self) -> Result<Digest> {
        compute_digest(
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_digest,
            self.nonce,
        )
    }

    /// Seal with the default attempt ceiling
    pub fn seal(&mut self, difficulty: u32) -> Result<SealReport> {
        self.seal_with(difficulty, &SealOptions::default())
    }

    /// Search nonces until the digest has `difficulty` leading hex zeros
    ///
    /// The search starts at the current nonce. On failure the record keeps
    /// its previous `(nonce, digest)` pair and must be discarded by the caller.
    #[tracing::instrument(skip(self, options), fields(index = self.index))]
    pub fn seal_with(&mut self, difficulty: u32, options: &SealOptions) -> Result<SealReport> {
        ensure_difficulty(difficulty)?;
        let max_attempts = options.attempt_ceiling(difficulty)?;
        if options.is_cancelled() {
            return Err(LedgerError::SealCancelled { attempts: 0 });
        }

        let start = Instant::now();
        let mut nonce = self.nonce;
        let mut digest = self.recompute_digest()?;
        let mut attempts: u64 = 0;

        loop {
            attempts += 1;
            if digest.meets_difficulty(difficulty) {
                break;
            }
            if attempts >= max_attempts {
                tracing::warn!(attempts, difficulty, "Mining failed: nonce limit exceeded");
                return Err(LedgerError::MiningExhausted {
                    max_attempts,
                    difficulty,
                });
            }
            if attempts % CANCEL_CHECK_INTERVAL == 0 && options.is_cancelled() {
                tracing::info!(attempts, "Sealing cancelled");
                return Err(LedgerError::SealCancelled { attempts });
            }

            nonce = nonce.checked_add(1).ok_or(LedgerError::MiningExhausted {
                max_attempts,
                difficulty,
            })?;
            digest = compute_digest(
                self.index,
                self.timestamp,
                &self.payload,
                &self.previous_digest,
                nonce,
            )?;
        }

        self.nonce = nonce;
        self.digest = digest;

        let report = SealReport {
            nonce,
            attempts,
            elapsed: start.elapsed(),
        };
        tracing::debug!(
            nonce,
            attempts,
            elapsed_ms = report.elapsed.as_millis() as u64,
            digest = %self.digest,
            "Record sealed"
        );
        Ok(report)
    }

    /// Verify the stored digest and check the proof-of-work predicate
    ///
    /// Returns `IntegrityMismatch` if the stored digest is stale, otherwise
    /// whether it carries at least `difficulty` leading hex zeros.
    pub fn verify_local(&self, difficulty: u32) -> Result<bool> {
        ensure_difficulty(difficulty)?;
        let computed = self.recompute_digest()?;
        if computed != self.digest {
            return Err(LedgerError::IntegrityMismatch {
                index: self.index,
                stored: self.digest,
                computed,
            });
        }
        Ok(self.digest.meets_difficulty(difficulty))
    }

    /// Export view for display and reporting
    pub fn to_view(&self) -> RecordView {
        RecordView {
            index: self.index,
            digest: self.digest.to_hex(),
            previous_digest: self.previous_digest.to_canonical(),
            timestamp: to_iso8601(self.timestamp),
            nonce: self.nonce,
            payload: self.payload.clone(),
        }
    }

    /// Overwrite the payload without resealing
    ///
    /// Leaves the stored digest stale on purpose; used to simulate tampering.
    #[cfg(any(test, feature = "fault-injection"))]
    pub fn force_mutate_for_testing(&mut self, payload: impl Into<String>) {
        self.payload = payload.into();
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record(index={}, timestamp={}, payload={}, previous_digest={}..., nonce={}, digest={}...)",
            self.index,
            to_iso8601(self.timestamp),
            self.payload,
            self.previous_digest.short(SHORT_DIGEST_LEN),
            self.nonce,
            self.digest.short(SHORT_DIGEST_LEN),
        )
    }
}
