pub mod audit_log;
pub mod config;
pub mod constants;
pub mod error;
pub mod rpc;
