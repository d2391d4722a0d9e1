//! Payouts substitutor library surface.
//!
//! Inspects payout candidate batches and, when a vault (oven) contract is about
//! to pay itself, redirects the payout to the vault's owner. The binary in
//! `src/main.rs` exposes this to the payout host as a stdio JSON-RPC extension.

pub mod engine;
pub mod error;
pub mod extension;
pub mod micheline;
pub mod tezos;
pub mod utils;
