//! Anchor Test: fetch, decode and audit failures abort the whole batch.

use crate::anchor_utils::*;
use payouts_substitutor::engine::{ContractStorage, SnapshotReader, SubstitutionResolver};
use payouts_substitutor::error::{DecodeError, StorageFetchError, SubstitutorError};
use payouts_substitutor::utils::config::{Config, RawConfig};
use payouts_substitutor::utils::rpc::TezosRpcReader;
use serde_json::json;

#[tokio::test]
async fn test_missing_contract_aborts_and_stops_fetching() {
    let cfg = config("debug", None);
    let reader = SnapshotReader::new()
        .with_storage(account(VAULT_A), oven_storage(Some(OWNER_A)))
        .with_storage(account(VAULT_B), oven_storage(Some(OWNER_B)));
    let input = vec![
        candidate(VAULT_A, VAULT_A),
        candidate(MULTISIG, MULTISIG),
        candidate(VAULT_B, VAULT_B),
    ];

    let err = SubstitutionResolver::new(&cfg, &reader)
        .resolve(3, &input)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SubstitutorError::StorageFetch(StorageFetchError::Status { status: 404, .. })
    ));
    assert_eq!(reader.fetch_count(), 2);
}

#[tokio::test]
async fn test_non_record_storage_is_a_decode_error_not_a_classification() {
    let cfg = config("debug", None);
    let reader = SnapshotReader::new().with_storage(
        account(VAULT_A),
        ContractStorage {
            storage: json!({"int": "12"}),
            storage_type: json!({"prim": "nat"}),
        },
    );

    let err = SubstitutionResolver::new(&cfg, &reader)
        .resolve(3, &[candidate(VAULT_A, VAULT_A)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SubstitutorError::Decode(DecodeError::NotRecord(_))
    ));
}

#[tokio::test]
async fn test_partial_log_but_no_summary_on_abort() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("substitutor.log");
    let cfg = config("debug", Some(&path));
    let reader = SnapshotReader::new();

    let result = SubstitutionResolver::new(&cfg, &reader)
        .resolve(44, &[candidate(DELEGATOR_X, DELEGATOR_Y), candidate(VAULT_A, VAULT_A)])
        .await;
    assert!(result.is_err());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("=== Cycle 44 ===\n"));
    assert!(content.contains(&format!("{DELEGATOR_X}: not a contract.")));
    assert!(!content.contains("candidates inspected."));
}

#[tokio::test]
async fn test_unwritable_audit_log_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("substitutor.log");
    let cfg = config("debug", Some(&path));
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    let reader = SnapshotReader::new();

    let err = SubstitutionResolver::new(&cfg, &reader)
        .resolve(5, &[candidate(DELEGATOR_X, DELEGATOR_Y)])
        .await
        .unwrap_err();
    assert!(matches!(err, SubstitutorError::AuditWrite(_)));
}

#[tokio::test]
async fn test_unreachable_node_is_storage_fetch_error() {
    let cfg = Config::from_raw(RawConfig {
        rpc_node: Some("http://127.0.0.1:9".to_string()),
        rpc_timeout_ms: Some(500),
        ..RawConfig::default()
    })
    .unwrap();
    let reader = TezosRpcReader::new(&cfg);

    let err = SubstitutionResolver::new(&cfg, &reader)
        .resolve(6, &[candidate(VAULT_A, VAULT_A)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SubstitutorError::StorageFetch(StorageFetchError::Transport { .. })
    ));
}
