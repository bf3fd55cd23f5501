//! Property tests over random payloads and tamper targets

#[cfg(test)]
mod tests {
    use ledger_core::utils::compute_digest;
    use ledger_core::{CheckKind, PreviousDigest};
    use proptest::prelude::*;

    use crate::{ledger_with, TEST_DIFFICULTY};

    fn payloads() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[ -~]{1,40}", 1..6)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn appended_chain_is_valid_and_linked(payloads in payloads()) {
            let refs: Vec<&str> = payloads.iter().map(String::as_str).collect();
            let ledger = ledger_with(TEST_DIFFICULTY, &refs);

            prop_assert_eq!(ledger.len(), payloads.len() + 1);
            prop_assert!(ledger.validate().is_valid());
            for (position, record) in ledger.iter().enumerate() {
                prop_assert_eq!(record.index(), position as u64);
                prop_assert!(record.digest().meets_difficulty(TEST_DIFFICULTY));
            }
            for pair in ledger.records().windows(2) {
                prop_assert_eq!(pair[1].previous_digest().digest(), Some(pair[0].digest()));
            }
        }

        #[test]
        fn tampering_fails_exactly_at_target(
            payloads in payloads(),
            target_seed in any::<prop::sample::Index>(),
            forged in "[ -~]{1,40}",
        ) {
            let refs: Vec<&str> = payloads.iter().map(String::as_str).collect();
            let mut ledger = ledger_with(TEST_DIFFICULTY, &refs);
            let target = target_seed.index(ledger.len()) as u64;
            let original = ledger.records()[target as usize].payload().to_string();
            prop_assume!(forged != original);

            ledger
                .record_mut_for_testing(target)
                .unwrap()
                .force_mutate_for_testing(forged);
            let report = ledger.validate();

            prop_assert_eq!(report.failed_index(), Some(target));
            prop_assert_eq!(report.failed_check(), Some(CheckKind::Integrity));
        }

        #[test]
        fn digest_is_deterministic_and_nonce_sensitive(
            index in 0u64..1_000,
            payload in "[ -~]{1,40}",
            timestamp in 0.0f64..4_000_000_000.0,
            nonce in 0u64..u64::MAX,
        ) {
            let previous = if index == 0 {
                PreviousDigest::Sentinel
            } else {
                PreviousDigest::Digest(ledger_core::Digest::from_bytes([7; 32]))
            };
            let a = compute_digest(index, timestamp, &payload, &previous, nonce).unwrap();
            let b = compute_digest(index, timestamp, &payload, &previous, nonce).unwrap();
            let c = compute_digest(index, timestamp, &payload, &previous, nonce + 1).unwrap();

            prop_assert_eq!(a, b);
            prop_assert_ne!(a, c);
        }
    }
}
