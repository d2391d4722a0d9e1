//! Anchor Test: a full host session over the line-delimited JSON-RPC channel.

use crate::anchor_utils::*;
use payouts_substitutor::engine::{ContractStorageReader, SnapshotReader};
use payouts_substitutor::extension::ExtensionEndpoint;
use payouts_substitutor::utils::config::Config;
use serde_json::{json, Value};

fn endpoint() -> ExtensionEndpoint {
    ExtensionEndpoint::new(Box::new(|_cfg: &Config| {
        Box::new(
            SnapshotReader::new()
                .with_storage(account(VAULT_A), oven_storage(Some(OWNER_A)))
                .with_storage(account(MULTISIG), multisig_storage()),
        ) as Box<dyn ContractStorageReader>
    }))
}

async fn run_session(lines: &[Value]) -> (Vec<Value>, ExtensionEndpoint) {
    let mut input = String::new();
    for line in lines {
        input.push_str(&line.to_string());
        input.push('\n');
    }
    let mut ep = endpoint();
    let mut output: Vec<u8> = Vec::new();
    ep.serve(input.as_bytes(), &mut output).await.unwrap();
    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (responses, ep)
}

#[tokio::test]
async fn test_init_hook_close_session() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("oven.log");
    let hook_data = json!({
        "cycle": 745,
        "candidates": [
            {"source": DELEGATOR_X, "recipient": DELEGATOR_X, "fee_rate": 500, "is_invalid": false},
            {"source": VAULT_A, "recipient": VAULT_A, "fee_rate": 500, "bonds_amount": "99000"},
            {"source": MULTISIG, "recipient": MULTISIG, "fee_rate": 0}
        ],
        "extra_host_field": {"kept": true}
    });

    let (responses, ep) = run_session(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "init", "params": {
            "baker_address": OWNER_B,
            "definition": {
                "name": "oven-substitutor",
                "configuration": {"LOG_FILE": log_path.to_str().unwrap(), "LOG_LEVEL": "redirects"}
            }
        }}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "after_candidates_generated", "params": {
            "version": "0.1",
            "data": hook_data
        }}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "close"}),
        json!({"jsonrpc": "2.0", "id": 4, "method": "init", "params": {}}),
    ])
    .await;

    assert!(ep.is_closed());
    assert_eq!(responses.len(), 3, "nothing is answered after close");
    assert_eq!(responses[0]["result"], json!({"success": true}));
    assert_eq!(responses[2]["result"], Value::Null);
    assert_eq!(responses[2]["id"], json!(3));

    let mut expected = hook_data.clone();
    expected["candidates"][1]["recipient"] = json!(OWNER_A);
    assert_eq!(responses[1]["id"], json!(2));
    assert_eq!(responses[1]["result"], expected);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(
        log,
        format!("=== Cycle 745 ===\n{VAULT_A}: redirected to {OWNER_A}.\n")
    );
}

#[tokio::test]
async fn test_batch_failure_is_internal_error_and_session_survives() {
    let (responses, ep) = run_session(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "init", "params": {
            "definition": {"configuration": {}}
        }}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "after_candidates_generated", "params": {
            "data": {"cycle": 9, "candidates": [{"source": VAULT_B, "recipient": VAULT_B}]}
        }}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "after_candidates_generated", "params": {
            "data": {"cycle": 9, "candidates": [{"source": VAULT_A, "recipient": VAULT_A}]}
        }}),
    ])
    .await;

    assert!(!ep.is_closed());
    assert_eq!(responses[1]["error"]["code"], json!(-32603));
    let detail = responses[1]["error"]["data"].as_str().unwrap();
    assert!(detail.contains(VAULT_B));
    assert_eq!(
        responses[2]["result"]["candidates"][0]["recipient"],
        json!(OWNER_A)
    );
}

#[tokio::test]
async fn test_malformed_candidate_address_is_invalid_params() {
    let (responses, _) = run_session(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "init", "params": {
            "definition": {"configuration": {}}
        }}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "after_candidates_generated", "params": {
            "data": {"cycle": 9, "candidates": [{"source": "0xdeadbeef", "recipient": VAULT_A}]}
        }}),
    ])
    .await;
    assert_eq!(responses[1]["error"]["code"], json!(-32602));
}
