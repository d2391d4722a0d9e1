//! Wire types for the host's extension calls.

use crate::engine::PayoutCandidate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const METHOD_INIT: &str = "init";
pub const METHOD_AFTER_CANDIDATES_GENERATED: &str = "after_candidates_generated";
pub const METHOD_CLOSE: &str = "close";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    /// Absent for notifications, which get no response.
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: "Internal error".to_string(),
            data: Some(Value::String(detail.into())),
        }
    }
}

pub fn success_response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub fn error_response(id: Value, error: &RpcError) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": error })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub configuration: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitMessage {
    #[serde(default)]
    pub definition: ExtensionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `data` of the after-candidates-generated hook. Unknown keys are echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesHookData {
    pub cycle: i64,
    pub candidates: Vec<PayoutCandidate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HookMessage {
    #[serde(default)]
    pub version: Option<String>,
    pub data: CandidatesHookData,
}
