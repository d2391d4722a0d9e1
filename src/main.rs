//! Extension binary spawned by the payout host.
//!
//! stdout carries the JSON-RPC channel, so diagnostics go to stderr.

use payouts_substitutor::engine::ContractStorageReader;
use payouts_substitutor::extension::ExtensionEndpoint;
use payouts_substitutor::utils::config::Config;
use payouts_substitutor::utils::rpc::TezosRpcReader;
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Default to `info` when `RUST_LOG` is unset or invalid.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "[STARTUP] payouts-substitutor {} waiting for host",
        env!("CARGO_PKG_VERSION")
    );

    let mut endpoint = ExtensionEndpoint::new(Box::new(|config: &Config| {
        Box::new(TezosRpcReader::new(config)) as Box<dyn ContractStorageReader>
    }));
    endpoint
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    tracing::info!("[STARTUP] endpoint stopped");
    Ok(())
}
