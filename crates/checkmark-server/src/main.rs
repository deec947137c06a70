//! Checkmark Server - Standalone entry point for the Checkmark API
//!
//! Thin wrapper around `checkmark-api`. Runs every deployment listed in
//! `CHECKMARK_DEPLOYMENTS` (default `items,todos`), each on its own port.

use anyhow::{Context, Result};
use checkmark_api::{CheckmarkServer, Deployment, ServerConfig};
use futures::future::try_join_all;

#[tokio::main]
async fn main() -> Result<()> {
    checkmark_api::server::init_tracing();

    tracing::info!("Starting Checkmark server...");

    let deployments = match std::env::var("CHECKMARK_DEPLOYMENTS") {
        Ok(list) => Deployment::parse_list(&list).context("invalid CHECKMARK_DEPLOYMENTS")?,
        Err(_) => Deployment::ALL.to_vec(),
    };
    if deployments.is_empty() {
        anyhow::bail!("CHECKMARK_DEPLOYMENTS names no deployment");
    }

    let servers = deployments.into_iter().map(|deployment| {
        let config = ServerConfig::from_env(deployment);
        tracing::info!(%deployment, addr = %config.addr, "Configured deployment");
        CheckmarkServer::new(config).run()
    });

    try_join_all(servers).await.map_err(|e| {
        tracing::error!("Server error during execution: {}", e);
        e
    })?;

    Ok(())
}
