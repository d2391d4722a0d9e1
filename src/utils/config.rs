use crate::error::{ConfigError, Result};
use crate::utils::constants::{
    DEFAULT_RPC_BLOCK, DEFAULT_RPC_NODE, DEFAULT_RPC_TIMEOUT_MS, MAX_RPC_TIMEOUT_MS,
    MIN_RPC_TIMEOUT_MS,
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

/// Audit severities, lowest first. `System` records always pass the threshold
/// and cannot be configured as one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Verbose,
    #[default]
    Contracts,
    Redirects,
    Errors,
    System,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Verbose => "verbose",
            Self::Contracts => "contracts",
            Self::Redirects => "redirects",
            Self::Errors => "errors",
            Self::System => "system",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "verbose" => Ok(Self::Verbose),
            "contracts" => Ok(Self::Contracts),
            "redirects" => Ok(Self::Redirects),
            "errors" => Ok(Self::Errors),
            "system" => Ok(Self::System),
            other => Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
    }
}

/// Configuration object as the host sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "LOG_FILE", default)]
    pub log_file: Option<String>,
    #[serde(rename = "LOG_LEVEL", default)]
    pub log_level: Option<String>,
    #[serde(rename = "RPC_NODE", default)]
    pub rpc_node: Option<String>,
    #[serde(rename = "RPC_TIMEOUT_MS", default)]
    pub rpc_timeout_ms: Option<u64>,
    #[serde(rename = "RPC_BLOCK", default)]
    pub rpc_block: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` disables the audit log.
    pub log_file: Option<PathBuf>,
    pub log_level: LogLevel,
    pub rpc_node: reqwest::Url,
    pub rpc_timeout_ms: u64,
    pub rpc_block: String,
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate_http_url(raw: &str) -> Result<reqwest::Url> {
    let parsed = raw
        .parse::<reqwest::Url>()
        .map_err(|e| ConfigError::InvalidRpcNode {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::InvalidRpcNode {
            url: raw.to_string(),
            reason: format!("scheme must be http(s), got `{other}`"),
        }
        .into()),
    }
}

fn validate_block_id(raw: &str) -> Result<()> {
    let ok = raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '~' | '-' | '+'));
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Malformed(format!("RPC_BLOCK `{raw}` is not a block identifier")).into())
    }
}

impl Config {
    /// Parses and validates the host's configuration payload.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let raw: RawConfig = serde_json::from_value(raw.clone())
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let log_level = match non_empty(raw.log_level) {
            Some(level) => level.parse::<LogLevel>()?,
            None => LogLevel::default(),
        };
        if log_level == LogLevel::System {
            return Err(ConfigError::InvalidLogLevel(log_level.to_string()).into());
        }

        let rpc_node_raw = non_empty(raw.rpc_node).unwrap_or_else(|| DEFAULT_RPC_NODE.to_string());
        let rpc_node = validate_http_url(&rpc_node_raw)?;

        let rpc_timeout_ms = raw
            .rpc_timeout_ms
            .map(|v| v.clamp(MIN_RPC_TIMEOUT_MS, MAX_RPC_TIMEOUT_MS))
            .unwrap_or(DEFAULT_RPC_TIMEOUT_MS);

        let rpc_block = non_empty(raw.rpc_block).unwrap_or_else(|| DEFAULT_RPC_BLOCK.to_string());
        validate_block_id(&rpc_block)?;

        let log_file = non_empty(raw.log_file).map(PathBuf::from);
        if let Some(path) = log_file.as_deref() {
            // Probe once so an unwritable path fails init instead of the first batch.
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| ConfigError::LogFile {
                    path: path.display().to_string(),
                    source,
                })?;
        }

        Ok(Self {
            log_file,
            log_level,
            rpc_node,
            rpc_timeout_ms,
            rpc_block,
        })
    }
}
