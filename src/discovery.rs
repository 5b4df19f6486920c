// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One discovery pass over the cluster

use crate::config::Config;
use crate::export::Discovered;
use crate::heuristics::find_services_cidr;
use crate::kubernetes::{detect_node, pod_namespace, ServiceProber};
use crate::net::Cidr;
use crate::resolv::DnsConfig;
use kube::Client;
use tracing::{info, warn};

/// Gather DNS settings, node facts and the service range.
///
/// Every step degrades to "nothing found" on failure.
pub async fn discover(client: &Client, config: &Config) -> Discovered {
    let dns = DnsConfig::load(&config.resolv_conf).await;

    let namespace = pod_namespace(&config.serviceaccount_dir);
    let node = detect_node(client, &namespace, config.hostname.as_deref()).await;

    let pod_cidr = node.pod_cidr.as_deref().and_then(|c| match Cidr::parse(c) {
        Ok(cidr) => Some(cidr),
        Err(e) => {
            warn!("Ignoring node pod CIDR: {}", e);
            None
        }
    });

    info!("Determining service range");
    let prober = ServiceProber::new(client.clone(), config.probe.clone());
    let service_cidr = find_services_cidr(&prober, &node.provider, config).await;
    match &service_cidr {
        Some(cidr) => info!("Service range is {}", cidr),
        None => warn!("Could not determine service range"),
    }

    Discovered {
        dns,
        service_cidr,
        pod_cidr,
        external_ip: node.external_ip,
    }
}
