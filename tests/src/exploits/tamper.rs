//! # Tamper Simulations
//!
//! ## Attack Vectors
//!
//! | Attack | Expected detection |
//! |--------|--------------------|
//! | Rewrite a payload in place | Integrity at the rewritten record |
//! | Rewrite and reseal one record | Linkage at the following record |
//! | Forge the genesis record | Integrity at index 0 |
//! | Drop a record from the middle | Linkage at the gap |
//! | Swap two records | Linkage at the first swapped position |
//! | Splice in an unsealed record | Proof-of-work at the spliced record |
//! | Rebuild the whole suffix | Not detected: only cost stops it |

#[cfg(test)]
mod tests {
    use ledger_core::{
        ChainFault, CheckKind, Ledger, PreviousDigest, Record, ValidationReport,
    };

    use crate::{ledger_with, TEST_DIFFICULTY};

    const PAYLOADS: [&str; 4] = [
        "Transaction 1: Jorge pays Vale 115 XRP",
        "Transaction 2: Vale pays Zero 45 XRP",
        "Transaction 3: Zero pays Jorge 78 XRP",
        "Transaction 4: Vale pays Jorge 12 XRP",
    ];

    fn sample_ledger() -> Ledger {
        ledger_with(TEST_DIFFICULTY, &PAYLOADS)
    }

    fn assert_fails_at(report: &ValidationReport, index: u64, check: CheckKind) {
        assert!(!report.is_valid(), "expected failure at {index}");
        assert_eq!(report.failed_index(), Some(index));
        assert_eq!(report.failed_check(), Some(check));
    }

    // =========================================================================
    // IN-PLACE MUTATION
    // =========================================================================

    #[test]
    fn test_payload_rewrite_detected_at_rewritten_record() {
        for target in 1..=PAYLOADS.len() as u64 {
            let mut ledger = sample_ledger();
            ledger
                .record_mut_for_testing(target)
                .unwrap()
                .force_mutate_for_testing("Transaction X: Vale pays Zero 555 XRP");

            assert_fails_at(&ledger.validate(), target, CheckKind::Integrity);
        }
    }

    #[test]
    fn test_tampering_record_one_not_reported_at_two() {
        let mut ledger = ledger_with(2, &["A", "B"]);
        ledger
            .record_mut_for_testing(1)
            .unwrap()
            .force_mutate_for_testing("TAMPERED");

        let report = ledger.validate();
        assert_fails_at(&report, 1, CheckKind::Integrity);
        match report.fault {
            Some(ChainFault::IntegrityMismatch {
                stored, computed, ..
            }) => {
                let record = &ledger.records()[1];
                assert_eq!(stored, *record.digest());
                assert_eq!(computed, record.recompute_digest().unwrap());
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn test_reverting_payload_restores_validity() {
        let mut ledger = sample_ledger();
        let original = ledger.records()[2].payload().to_string();
        let record = ledger.record_mut_for_testing(2).unwrap();

        record.force_mutate_for_testing("forged");
        record.force_mutate_for_testing(original);
        assert!(ledger.validate().is_valid());
    }

    #[test]
    fn test_genesis_forgery_detected_first() {
        let mut ledger = sample_ledger();
        ledger
            .record_mut_for_testing(0)
            .unwrap()
            .force_mutate_for_testing("Forged Genesis");
        ledger
            .record_mut_for_testing(3)
            .unwrap()
            .force_mutate_for_testing("also forged");

        assert_fails_at(&ledger.validate(), 0, CheckKind::Integrity);
    }

    #[test]
    fn test_earliest_of_several_tampered_records_reported() {
        let mut ledger = sample_ledger();
        for target in [4, 2, 3] {
            ledger
                .record_mut_for_testing(target)
                .unwrap()
                .force_mutate_for_testing("forged");
        }
        assert_fails_at(&ledger.validate(), 2, CheckKind::Integrity);
    }

    // =========================================================================
    // RESEALING
    // =========================================================================

    #[test]
    fn test_resealed_record_breaks_next_link() {
        let mut ledger = sample_ledger();
        let record = ledger.record_mut_for_testing(2).unwrap();
        record.force_mutate_for_testing("Transaction 2: Vale pays Zero 555 XRP");
        record.seal(TEST_DIFFICULTY).unwrap();

        let report = ledger.validate();
        assert_fails_at(&report, 3, CheckKind::Linkage);
        assert_eq!(report.records_checked, 3);
    }

    #[test]
    fn test_resealing_last_record_goes_undetected() {
        let mut ledger = sample_ledger();
        let last = ledger.len() as u64 - 1;
        let record = ledger.record_mut_for_testing(last).unwrap();
        record.force_mutate_for_testing("rewritten tip");
        record.seal(TEST_DIFFICULTY).unwrap();

        // Nothing commits to the tip, so a resealed tip is indistinguishable
        assert!(ledger.validate().is_valid());
    }

    #[test]
    fn test_rebuilt_suffix_requires_remining_everything() {
        let honest = sample_ledger();
        let mut forged: Vec<Record> = honest.records()[..2].to_vec();

        let mut previous = *forged[1].digest();
        for (offset, payload) in ["forged 2", "forged 3", "forged 4"].iter().enumerate() {
            let mut record = Record::new(
                offset as u64 + 2,
                *payload,
                PreviousDigest::Digest(previous),
                None,
            )
            .unwrap();
            record.seal(TEST_DIFFICULTY).unwrap();
            previous = *record.digest();
            forged.push(record);
        }

        let rewritten = Ledger::from_records(TEST_DIFFICULTY, forged).unwrap();
        assert!(rewritten.validate().is_valid());
        assert_ne!(
            rewritten.latest().unwrap().digest(),
            honest.latest().unwrap().digest()
        );
    }

    // =========================================================================
    // STRUCTURAL ATTACKS
    // =========================================================================

    #[test]
    fn test_dropped_record_detected_at_gap() {
        let mut records = sample_ledger().records().to_vec();
        records.remove(2);

        let ledger = Ledger::from_records(TEST_DIFFICULTY, records).unwrap();
        assert_fails_at(&ledger.validate(), 2, CheckKind::Linkage);
    }

    #[test]
    fn test_swapped_records_detected() {
        let mut records = sample_ledger().records().to_vec();
        records.swap(1, 2);

        let ledger = Ledger::from_records(TEST_DIFFICULTY, records).unwrap();
        assert_fails_at(&ledger.validate(), 1, CheckKind::Linkage);
    }

    #[test]
    fn test_truncated_ledger_still_valid() {
        let mut records = sample_ledger().records().to_vec();
        records.truncate(2);

        let ledger = Ledger::from_records(TEST_DIFFICULTY, records).unwrap();
        assert!(ledger.validate().is_valid());
    }

    #[test]
    fn test_unsealed_splice_fails_work_check() {
        let mut records = sample_ledger().records().to_vec();
        let position = records.len() as u64;
        let tip = *records[records.len() - 1].digest();

        // Skip the nonce search; pick a timestamp whose unsealed digest misses
        let spliced = (0u32..)
            .map(|ts| {
                Record::new(
                    position,
                    "free money",
                    PreviousDigest::Digest(tip),
                    Some(f64::from(ts)),
                )
                .unwrap()
            })
            .find(|record| !record.digest().meets_difficulty(TEST_DIFFICULTY))
            .unwrap();
        records.push(spliced);

        let ledger = Ledger::from_records(TEST_DIFFICULTY, records).unwrap();
        assert_fails_at(&ledger.validate(), position, CheckKind::ProofOfWork);
    }

    #[test]
    fn test_empty_ledger_reported() {
        let ledger = Ledger::from_records(TEST_DIFFICULTY, Vec::new()).unwrap();
        let report = ledger.validate();
        assert_eq!(report.fault, Some(ChainFault::EmptyLedger));
        assert_eq!(report.failed_check(), Some(CheckKind::NonEmpty));
    }
}
