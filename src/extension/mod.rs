//! Host channel: the JSON-RPC endpoint the payout host drives over stdio.

pub mod endpoint;
pub mod protocol;

pub use endpoint::{ExtensionEndpoint, ReaderFactory};
