//! # Integration Test Flows
//!
//! Tests that ledger-core and ledger-telemetry work together through the
//! observer port.
//!
//! ## Flows Tested:
//!
//! 1. **Ledger → CompositeObserver → LedgerMetrics + PrometheusObserver**
//! 2. **SharedLedger under concurrent writers**: appends serialize, chain stays valid
//! 3. **Export views**: summaries and record views serialize to stable JSON

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;

    use ledger_core::{
        CheckKind, CompositeObserver, Ledger, LedgerConfig, LedgerError, LedgerMetrics,
        SealOptions, SharedLedger,
    };
    use ledger_telemetry::PrometheusObserver;
    use prometheus::Registry;

    use crate::{ledger_with, TEST_DIFFICULTY};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Observed {
        metrics: Arc<LedgerMetrics>,
        prometheus: Arc<PrometheusObserver>,
        ledger: Ledger,
    }

    fn observed_ledger(config: &LedgerConfig) -> Observed {
        let metrics = Arc::new(LedgerMetrics::new());
        let prometheus = Arc::new(PrometheusObserver::register(&Registry::new()).unwrap());
        let observer = CompositeObserver::new()
            .add_observer(metrics.clone())
            .add_observer(prometheus.clone());
        let ledger = Ledger::with_observer(config, Arc::new(observer)).unwrap();
        Observed {
            metrics,
            prometheus,
            ledger,
        }
    }

    // =============================================================================
    // LEDGER → OBSERVERS
    // =============================================================================

    #[test]
    fn test_observers_see_every_append() {
        let Observed {
            metrics,
            prometheus,
            mut ledger,
        } = observed_ledger(&LedgerConfig::with_difficulty(TEST_DIFFICULTY));

        for payload in ["A", "B", "C"] {
            ledger.append(payload).unwrap();
        }
        assert!(ledger.validate().is_valid());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_sealed, 4);
        assert_eq!(snapshot.records_appended, 4);
        assert_eq!(snapshot.validations, 1);
        assert!(snapshot.avg_attempts_per_seal >= 1.0);

        let text = prometheus.render().unwrap();
        assert!(text.contains("ledger_records_sealed_total 4"));
        assert!(text.contains("ledger_chain_height 4"));
        assert!(text.contains("ledger_validations_total{outcome=\"valid\"} 1"));
    }

    #[test]
    fn test_failed_seal_reaches_observers_without_appending() {
        let config = LedgerConfig {
            difficulty: TEST_DIFFICULTY,
            ..LedgerConfig::default()
        };
        let Observed {
            metrics,
            prometheus,
            mut ledger,
        } = observed_ledger(&config);

        let cancel = Arc::new(AtomicBool::new(true));
        let err = ledger
            .append_with("A", &SealOptions::default().with_cancel_flag(cancel))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(ledger.len(), 1);

        assert_eq!(metrics.snapshot().seal_failures, 1);
        let text = prometheus.render().unwrap();
        assert!(text.contains("ledger_seal_failures_total{reason=\"cancelled\"} 1"));
    }

    #[test]
    fn test_tampering_counted_as_validation_fault() {
        let Observed {
            metrics,
            prometheus,
            mut ledger,
        } = observed_ledger(&LedgerConfig::with_difficulty(TEST_DIFFICULTY));
        ledger.append("A").unwrap();

        ledger
            .record_mut_for_testing(1)
            .unwrap()
            .force_mutate_for_testing("B");
        let report = ledger.validate();
        assert_eq!(report.failed_check(), Some(CheckKind::Integrity));

        assert_eq!(metrics.snapshot().validation_failures, 1);
        let text = prometheus.render().unwrap();
        assert!(text.contains("ledger_validation_faults_total{check=\"integrity\"} 1"));
    }

    #[test]
    fn test_configured_attempt_ceiling_bounds_genesis() {
        let config = LedgerConfig {
            difficulty: 30,
            genesis_payload: "Genesis Block".to_string(),
            max_attempts: Some(10),
        };
        let err = Ledger::with_config(&config).unwrap_err();
        assert_eq!(
            err,
            LedgerError::MiningExhausted {
                max_attempts: 10,
                difficulty: 30
            }
        );
        assert!(err.is_recoverable());
    }

    // =============================================================================
    // SHARED LEDGER
    // =============================================================================

    #[test]
    fn test_shared_ledger_concurrent_writers_and_readers() {
        let shared = SharedLedger::new(ledger_with(TEST_DIFFICULTY, &[]));

        let writers: Vec<_> = (0..3)
            .map(|w| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..4 {
                        shared.append(format!("writer {w} payment {i}")).unwrap();
                    }
                })
            })
            .collect();
        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    assert!(shared.validate().is_valid());
                }
            })
        };

        for handle in writers {
            handle.join().unwrap();
        }
        reader.join().unwrap();

        let records = shared.snapshot();
        assert_eq!(records.len(), 13);
        for (position, record) in records.iter().enumerate() {
            assert_eq!(record.index(), position as u64);
        }
        assert!(shared.summary().is_valid);
    }

    // =============================================================================
    // EXPORT VIEWS
    // =============================================================================

    #[test]
    fn test_summary_json_shape() {
        let ledger = ledger_with(TEST_DIFFICULTY, &["Jorge pays Vale 115 XRP"]);
        let json = serde_json::to_value(ledger.summary()).unwrap();

        assert_eq!(json["total_records"], 2);
        assert_eq!(json["difficulty"], TEST_DIFFICULTY);
        assert_eq!(json["is_valid"], true);
        assert_eq!(
            json["latest_digest"].as_str().unwrap(),
            ledger.latest().unwrap().digest().to_hex()
        );
    }

    #[test]
    fn test_record_views_link_up() {
        let ledger = ledger_with(TEST_DIFFICULTY, &["A", "B"]);
        let views = ledger.views();

        assert_eq!(views[0].previous_digest, "0");
        for pair in views.windows(2) {
            assert_eq!(pair[1].previous_digest, pair[0].digest);
        }
        assert!(views.iter().all(|v| v.timestamp.ends_with('Z')));

        let json = serde_json::to_value(&views[1]).unwrap();
        assert_eq!(json["payload"], "A");
        assert_eq!(json["index"], 1);
    }

    #[test]
    fn test_record_display_truncates_digests() {
        let ledger = ledger_with(TEST_DIFFICULTY, &["A"]);
        let rendered = ledger.latest().unwrap().to_string();
        let prefix = &ledger.latest().unwrap().digest().to_hex()[..10];

        assert!(rendered.starts_with("Record(index=1, "));
        assert!(rendered.contains(&format!("digest={prefix}...")));
    }
}
