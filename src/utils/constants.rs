/// Public Tezos node used when `RPC_NODE` is not configured.
pub const DEFAULT_RPC_NODE: &str = "https://eu.rpc.tez.capital";

/// Block the storage snapshot is read from unless `RPC_BLOCK` says otherwise.
pub const DEFAULT_RPC_BLOCK: &str = "head";

/// Per-request HTTP timeout for the storage reader.
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;
pub const MIN_RPC_TIMEOUT_MS: u64 = 250;
pub const MAX_RPC_TIMEOUT_MS: u64 = 120_000;

/// Storage field whose presence marks a vault (oven) contract.
pub const OVEN_MARKER_FIELD: &str = "ovenProxyContractAddress";

/// Storage field naming the account entitled to a vault's payouts.
pub const OWNER_FIELD: &str = "owner";

/// Longest node response excerpt carried inside an error.
pub const RPC_ERR_MAX_LEN: usize = 260;
