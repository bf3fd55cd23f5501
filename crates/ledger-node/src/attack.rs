//! Tampering demonstration
//!
//! Rewrites the payload of a sealed record without resealing it, then
//! validates the chain to show where the damage is detected.

use ledger_core::{CheckKind, Digest, Ledger, Result, SharedLedger};
use serde::Serialize;
use tracing::{info, warn};

/// Payload written over the target record
pub const FORGED_PAYLOAD: &str = "Transaction 2: Vale pays Zero 555 XRP";

/// What the tampering demonstration observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackOutcome {
    /// Record that was modified
    pub target: u64,
    /// Payload before the attack
    pub original_payload: String,
    /// Payload after the attack
    pub forged_payload: String,
    /// Digest still stored in the record
    pub stored_digest: Digest,
    /// Digest recomputed from the forged fields
    pub recomputed_digest: Digest,
    /// Whether validation rejected the chain
    pub detected: bool,
    /// First failing record
    pub failed_index: Option<u64>,
    /// First failing check
    pub failed_check: Option<CheckKind>,
}

/// Forge record `target` and validate
///
/// Returns `Ok(None)` when the ledger is too short to reach `target`.
pub fn simulate_attack(
    shared: &SharedLedger,
    target: u64,
    forged_payload: &str,
) -> Result<Option<AttackOutcome>> {
    shared.with_ledger_mut(|ledger| forge(ledger, target, forged_payload))
}

fn forge(ledger: &mut Ledger, target: u64, forged_payload: &str) -> Result<Option<AttackOutcome>> {
    let records = ledger.len();
    let Some(record) = ledger.record_mut_for_testing(target) else {
        warn!(
            index = target,
            records,
            "Not enough records to simulate the attack"
        );
        return Ok(None);
    };

    let original_payload = record.payload().to_string();
    record.force_mutate_for_testing(forged_payload);
    let stored_digest = *record.digest();
    let recomputed_digest = record.recompute_digest()?;
    info!(
        index = target,
        %original_payload,
        forged_payload,
        "Record payload overwritten"
    );

    let report = ledger.validate();
    Ok(Some(AttackOutcome {
        target,
        original_payload,
        forged_payload: forged_payload.to_string(),
        stored_digest,
        recomputed_digest,
        detected: !report.is_valid(),
        failed_index: report.failed_index(),
        failed_check: report.failed_check(),
    }))
}
