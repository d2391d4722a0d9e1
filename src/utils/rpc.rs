//! Contract storage reader backed by a Tezos node's RPC.
//!
//! One POST per contract, no retries: any failure surfaces to the resolver,
//! which aborts the batch.

use crate::engine::reader::{ContractStorage, ContractStorageReader};
use crate::error::StorageFetchError;
use crate::tezos::AccountId;
use crate::utils::config::Config;
use crate::utils::constants::RPC_ERR_MAX_LEN;
use crate::utils::error::compact_node_body;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ScriptResponse {
    code: Value,
    storage: Value,
}

pub struct TezosRpcReader {
    client: Client,
    base: String,
    block: String,
}

impl TezosRpcReader {
    pub fn new(config: &Config) -> Self {
        let client = match Client::builder()
            .timeout(Duration::from_millis(config.rpc_timeout_ms))
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(
                    "[RPC] failed to build HTTP client with {}ms timeout: {err}; using default client",
                    config.rpc_timeout_ms
                );
                Client::new()
            }
        };
        Self {
            client,
            base: config.rpc_node.as_str().trim_end_matches('/').to_string(),
            block: config.rpc_block.clone(),
        }
    }

    pub fn script_url(&self, contract: &AccountId) -> String {
        format!(
            "{}/chains/main/blocks/{}/context/contracts/{}/script/normalized",
            self.base, self.block, contract
        )
    }
}

#[async_trait]
impl ContractStorageReader for TezosRpcReader {
    async fn fetch(&self, contract: &AccountId) -> Result<ContractStorage, StorageFetchError> {
        let url = self.script_url(contract);
        tracing::debug!("[RPC] fetching storage of {contract} from {url}");

        let transport = |err: reqwest::Error| StorageFetchError::Transport {
            contract: contract.to_string(),
            reason: err.to_string(),
        };
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "unparsing_mode": "Readable" }))
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(StorageFetchError::Status {
                contract: contract.to_string(),
                status: status.as_u16(),
                body: compact_node_body(&body, RPC_ERR_MAX_LEN),
            });
        }
        parse_script(contract, &body)
    }
}

/// Splits a `script/normalized` body into the storage value and its type.
pub fn parse_script(contract: &AccountId, body: &str) -> Result<ContractStorage, StorageFetchError> {
    let malformed = |reason: String| StorageFetchError::MalformedScript {
        contract: contract.to_string(),
        reason,
    };
    let script: ScriptResponse = serde_json::from_str(body).map_err(|e| {
        malformed(format!(
            "{e}; body={}",
            compact_node_body(body, RPC_ERR_MAX_LEN)
        ))
    })?;
    let storage_type = storage_type_from_code(&script.code)
        .cloned()
        .ok_or_else(|| malformed("code has no storage section".to_string()))?;
    Ok(ContractStorage {
        storage: script.storage,
        storage_type,
    })
}

fn storage_type_from_code(code: &Value) -> Option<&Value> {
    code.as_array()?.iter().find_map(|section| {
        if section.get("prim")?.as_str()? != "storage" {
            return None;
        }
        section.get("args")?.as_array()?.first()
    })
}
