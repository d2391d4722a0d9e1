//! Anchor Test: the audit file holds exactly the records at or above the threshold.

use crate::anchor_utils::*;
use payouts_substitutor::engine::{SnapshotReader, SubstitutionResolver};

fn mixed_batch() -> Vec<payouts_substitutor::engine::PayoutCandidate> {
    vec![
        candidate(DELEGATOR_X, DELEGATOR_Y),
        candidate(VAULT_B, OWNER_B),
        candidate(MULTISIG, MULTISIG),
        candidate(VAULT_A, VAULT_A),
        candidate(VAULT_B, VAULT_B),
    ]
}

fn snapshot() -> SnapshotReader {
    SnapshotReader::new()
        .with_storage(account(VAULT_A), oven_storage(Some(OWNER_A)))
        .with_storage(account(VAULT_B), oven_storage(None))
        .with_storage(account(MULTISIG), multisig_storage())
}

async fn audit_lines(level: &str) -> Vec<String> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("substitutor.log");
    let cfg = config(level, Some(&path));
    let reader = snapshot();
    SubstitutionResolver::new(&cfg, &reader)
        .resolve(512, &mixed_batch())
        .await
        .unwrap();
    std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_errors_threshold_keeps_banner_and_warnings_only() {
    assert_eq!(
        audit_lines("errors").await,
        vec![
            "=== Cycle 512 ===".to_string(),
            format!("{VAULT_B}: WARNING: no owner address. Kept unchanged."),
        ]
    );
}

#[tokio::test]
async fn test_default_contracts_threshold() {
    assert_eq!(
        audit_lines("contracts").await,
        vec![
            "=== Cycle 512 ===".to_string(),
            format!("{VAULT_B}: already substituted."),
            format!("{MULTISIG}: not an oven."),
            format!("{VAULT_A}: redirected to {OWNER_A}."),
            format!("{VAULT_B}: WARNING: no owner address. Kept unchanged."),
        ]
    );
}

#[tokio::test]
async fn test_debug_threshold_adds_frame_details() {
    let lines = audit_lines("debug").await;
    assert_eq!(lines[0], "=== Cycle 512 ===");
    assert_eq!(lines[1], "RPC node is https://eu.rpc.tez.capital/");
    assert_eq!(lines[2], "Log level is debug");
    assert_eq!(lines[3], format!("{DELEGATOR_X}: not a contract."));
    assert_eq!(lines.last().map(String::as_str), Some("5 candidates inspected."));
    assert_eq!(lines.len(), 9);
}

#[tokio::test]
async fn test_disabled_log_still_reports_records() {
    let cfg = config("debug", None);
    let reader = snapshot();
    let resolution = SubstitutionResolver::new(&cfg, &reader)
        .resolve(512, &mixed_batch())
        .await
        .unwrap();
    assert!(cfg.log_file.is_none());
    assert_eq!(resolution.candidates.len(), 5);
    assert_eq!(resolution.audit.len(), 8);
}
