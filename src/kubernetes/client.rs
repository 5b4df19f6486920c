// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation

use crate::error::{NetscoutError, Result};
use kube::{Client, Config as KConfig};
use tracing::{debug, info};

/// Create a client from the pod's service account, falling back to the local
/// kubeconfig when not running in a cluster
pub async fn create_cluster_client() -> Result<Client> {
    let config = match KConfig::incluster() {
        Ok(c) => {
            info!("Using in-cluster service account credentials");
            c
        }
        Err(e) => {
            debug!("In-cluster config unavailable ({}), inferring config", e);
            KConfig::infer()
                .await
                .map_err(|e| NetscoutError::ClientError(format!("Failed to infer config: {}", e)))?
        }
    };

    Client::try_from(config)
        .map_err(|e| NetscoutError::ClientError(format!("Failed to create client: {}", e)))
}
