// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use netscout::config::Config;
use netscout::discovery::discover;
use netscout::export::{render_exports, Environment};
use netscout::kubernetes::create_cluster_client;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout is eval'd by the calling shell, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let environment = Environment::from_process();

    info!("Connecting to KubeAPI");
    let client = create_cluster_client()
        .await
        .context("Failed to connect to the Kubernetes API")?;

    let found = discover(&client, &config).await;

    print!("{}", render_exports(&environment, &found));
    Ok(())
}
