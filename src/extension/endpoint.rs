//! Line-delimited JSON-RPC endpoint answering the payout host.
//!
//! Requests are handled one at a time on the calling task; a batch is fully
//! resolved before the next line is read.

use super::protocol::{
    error_response, success_response, CandidatesHookData, HookMessage, InitMessage, InitResult,
    RpcError, RpcRequest, INVALID_PARAMS, METHOD_AFTER_CANDIDATES_GENERATED, METHOD_CLOSE,
    METHOD_INIT, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::engine::{ContractStorageReader, SubstitutionResolver};
use crate::utils::config::Config;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub type ReaderFactory = Box<dyn Fn(&Config) -> Box<dyn ContractStorageReader> + Send + Sync>;

struct Session {
    config: Config,
    reader: Box<dyn ContractStorageReader>,
}

pub struct ExtensionEndpoint {
    session: Option<Session>,
    make_reader: ReaderFactory,
    closed: bool,
}

impl ExtensionEndpoint {
    pub fn new(make_reader: ReaderFactory) -> Self {
        Self {
            session: None,
            make_reader,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Reads requests until `close` or end of input, answering each on `output`.
    pub async fn serve<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while !self.closed {
            let Some(line) = lines.next_line().await? else {
                tracing::info!("[EXT] host closed the channel");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                output.write_all(&encoded).await?;
                output.flush().await?;
            }
        }
        Ok(())
    }

    /// Handles one request line; `None` for notifications.
    pub async fn handle_line(&mut self, line: &str) -> Option<Value> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!("[EXT] unparseable request: {err}");
                let error = RpcError::new(PARSE_ERROR, format!("Parse error: {err}"));
                return Some(error_response(Value::Null, &error));
            }
        };
        let id = request.id.clone();
        let outcome = self.dispatch(&request.method, request.params).await;
        let id = id?;
        Some(match outcome {
            Ok(result) => success_response(id, result),
            Err(error) => error_response(id, &error),
        })
    }

    async fn dispatch(&mut self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            METHOD_INIT => {
                let message: InitMessage = parse_params(params)?;
                to_value(&self.init(message))
            }
            METHOD_AFTER_CANDIDATES_GENERATED => {
                let message: HookMessage = parse_params(params)?;
                let data = self.after_candidates_generated(message).await?;
                to_value(&data)
            }
            METHOD_CLOSE => {
                tracing::info!("[EXT] close requested");
                self.closed = true;
                Ok(Value::Null)
            }
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    fn init(&mut self, message: InitMessage) -> InitResult {
        let Some(raw) = message.definition.configuration else {
            return InitResult {
                success: false,
                message: Some("no Configuration provided".to_string()),
            };
        };
        match Config::from_json(&raw) {
            Ok(config) => {
                tracing::info!(
                    "[EXT] initialized{}: rpc={} level={} log_file={}",
                    message
                        .definition
                        .name
                        .as_deref()
                        .map(|name| format!(" as `{name}`"))
                        .unwrap_or_default(),
                    config.rpc_node,
                    config.log_level,
                    config
                        .log_file
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<disabled>".to_string())
                );
                let reader = (self.make_reader)(&config);
                self.session = Some(Session { config, reader });
                InitResult {
                    success: true,
                    message: None,
                }
            }
            Err(err) => {
                tracing::error!("[EXT] rejected configuration: {err}");
                InitResult {
                    success: false,
                    message: Some(format!("invalid Configuration provided: {err}")),
                }
            }
        }
    }

    async fn after_candidates_generated(
        &mut self,
        message: HookMessage,
    ) -> Result<CandidatesHookData, RpcError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| RpcError::internal("extension is not initialized"))?;
        let mut data = message.data;
        let resolver = SubstitutionResolver::new(&session.config, session.reader.as_ref());
        match resolver.resolve(data.cycle, &data.candidates).await {
            Ok(resolution) => {
                tracing::info!(
                    "[EXT] cycle {}: {} candidates, {} redirected",
                    data.cycle,
                    resolution.candidates.len(),
                    resolution.redirected()
                );
                data.candidates = resolution.candidates;
                Ok(data)
            }
            Err(err) => {
                tracing::error!("[EXT] cycle {} aborted: {err}", data.cycle);
                Err(RpcError::internal(err.to_string()))
            }
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    serde_json::from_value(params)
        .map_err(|err| RpcError::new(INVALID_PARAMS, format!("Invalid params: {err}")))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|err| RpcError::internal(err.to_string()))
}
