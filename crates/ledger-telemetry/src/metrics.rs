//! Prometheus metrics for the ledger.
//!
//! All metrics follow the naming convention: `ledger_<metric>_<unit>`
//!
//! Collectors are registered into a caller-owned [`Registry`], so several
//! ledgers (or tests) never share counters by accident.

use ledger_core::{LedgerError, LedgerObserver, Record, SealReport, ValidationReport};
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};
use std::time::Duration;

use crate::TelemetryError;

/// [`LedgerObserver`] that records into Prometheus collectors
#[derive(Clone)]
pub struct PrometheusObserver {
    registry: Registry,
    records_sealed: IntCounter,
    seal_failures: IntCounterVec,
    seal_attempts: Histogram,
    seal_duration: Histogram,
    chain_height: IntGauge,
    validations: IntCounterVec,
    validation_faults: IntCounterVec,
    validation_duration: Histogram,
}

impl PrometheusObserver {
    /// Create the collectors and register them into `registry`
    pub fn register(registry: &Registry) -> Result<Self, TelemetryError> {
        let records_sealed = IntCounter::new(
            "ledger_records_sealed_total",
            "Total number of records sealed by proof-of-work",
        )?;

        let seal_failures = IntCounterVec::new(
            Opts::new(
                "ledger_seal_failures_total",
                "Sealing attempts that did not produce a record",
            ),
            &["reason"], // exhausted, cancelled, other
        )?;

        let seal_attempts = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_seal_attempts",
                "Digests computed per successful seal",
            )
            .buckets(exponential_buckets(1.0, 4.0, 12)?),
        )?;

        let seal_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_seal_duration_seconds",
                "Time spent searching for a nonce",
            )
            .buckets(exponential_buckets(0.0001, 2.0, 18)?),
        )?;

        let chain_height = IntGauge::new(
            "ledger_chain_height",
            "Number of records in the ledger",
        )?;

        let validations = IntCounterVec::new(
            Opts::new("ledger_validations_total", "Full-chain validation passes"),
            &["outcome"], // valid, invalid
        )?;

        let validation_faults = IntCounterVec::new(
            Opts::new(
                "ledger_validation_faults_total",
                "Validation failures by the check that failed first",
            ),
            &["check"],
        )?;

        let validation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_validation_duration_seconds",
                "Time spent validating the whole chain",
            )
            .buckets(exponential_buckets(0.00001, 2.0, 16)?),
        )?;

        registry.register(Box::new(records_sealed.clone()))?;
        registry.register(Box::new(seal_failures.clone()))?;
        registry.register(Box::new(seal_attempts.clone()))?;
        registry.register(Box::new(seal_duration.clone()))?;
        registry.register(Box::new(chain_height.clone()))?;
        registry.register(Box::new(validations.clone()))?;
        registry.register(Box::new(validation_faults.clone()))?;
        registry.register(Box::new(validation_duration.clone()))?;

        tracing::debug!("Ledger Prometheus metrics registered");

        Ok(Self {
            registry: registry.clone(),
            records_sealed,
            seal_failures,
            seal_attempts,
            seal_duration,
            chain_height,
            validations,
            validation_faults,
            validation_duration,
        })
    }

    /// Encode every metric in the registry in the Prometheus text format
    pub fn render(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| TelemetryError::Encode(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Encode(e.to_string()))
    }
}

fn failure_reason(error: &LedgerError) -> &'static str {
    match error {
        LedgerError::MiningExhausted { .. } => "exhausted",
        LedgerError::SealCancelled { .. } => "cancelled",
        _ => "other",
    }
}

impl LedgerObserver for PrometheusObserver {
    fn on_record_sealed(&self, _index: u64, report: &SealReport) {
        self.records_sealed.inc();
        self.seal_attempts.observe(report.attempts as f64);
        self.seal_duration.observe(report.elapsed.as_secs_f64());
    }

    fn on_seal_failed(&self, _index: u64, error: &LedgerError) {
        self.seal_failures
            .with_label_values(&[failure_reason(error)])
            .inc();
    }

    fn on_record_appended(&self, record: &Record) {
        let height = record.index().saturating_add(1);
        self.chain_height
            .set(i64::try_from(height).unwrap_or(i64::MAX));
    }

    fn on_chain_validated(&self, report: &ValidationReport, elapsed: Duration) {
        self.validation_duration.observe(elapsed.as_secs_f64());
        match report.failed_check() {
            None => self.validations.with_label_values(&["valid"]).inc(),
            Some(check) => {
                self.validations.with_label_values(&["invalid"]).inc();
                self.validation_faults
                    .with_label_values(&[check.as_str()])
                    .inc();
            }
        }
    }
}
