// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! GCE/GKE service range lookup

use crate::constants::provider::{
    GCE_METADATA_HEADER, GCE_METADATA_HEADER_VALUE, GCE_METADATA_TIMEOUT_SECS,
};
use crate::error::Result;
use crate::kubernetes::ServiceProber;
use crate::net::Cidr;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// The part of the instance `kube-env` attribute we care about
#[derive(Debug, Deserialize)]
struct KubeEnv {
    #[serde(rename = "SERVICE_CLUSTER_IP_RANGE")]
    service_cluster_ip_range: Option<String>,
}

/// Find the service range on GCE.
///
/// Prefers the range configured in instance metadata and falls back to the
/// `10.X.240.0/20` layout GKE uses, with `X` taken from a cluster-assigned IP.
#[instrument(skip(prober))]
pub async fn find_gce_range(prober: &ServiceProber, metadata_url: &Url) -> Option<Cidr> {
    if let Some(cidr) = metadata_service_range(metadata_url).await {
        info!("Instance metadata reports service range {}", cidr);
        if prober.confirm_range(&cidr).await {
            return Some(cidr);
        }
    }

    let sample = prober.probe(None, false).await?;
    let cidr = gke_range_for(sample)?;
    debug!("Cluster assigned {}, trying GKE layout {}", sample, cidr);
    prober.confirm_range(&cidr).await.then_some(cidr)
}

/// Read `SERVICE_CLUSTER_IP_RANGE` from the metadata server, ignoring any failure
pub async fn metadata_service_range(url: &Url) -> Option<Cidr> {
    let body = match fetch_kube_env(url).await {
        Ok(body) => body,
        Err(e) => {
            debug!("kube-env metadata unavailable: {}", e);
            return None;
        }
    };
    match parse_kube_env(&body) {
        Ok(cidr) => cidr,
        Err(e) => {
            debug!("kube-env metadata unusable: {}", e);
            None
        }
    }
}

async fn fetch_kube_env(url: &Url) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(GCE_METADATA_TIMEOUT_SECS))
        .build()?;
    let body = client
        .get(url.clone())
        .header(GCE_METADATA_HEADER, GCE_METADATA_HEADER_VALUE)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body)
}

/// Extract the service range from a YAML `kube-env` document
pub fn parse_kube_env(body: &str) -> Result<Option<Cidr>> {
    let env: KubeEnv = serde_yaml::from_str(body)?;
    env.service_cluster_ip_range
        .map(|range| Cidr::parse(&range))
        .transpose()
}

/// GKE carves service IPs out of `10.X.240.0/20`
pub fn gke_range_for(sample: IpAddr) -> Option<Cidr> {
    let IpAddr::V4(v4) = sample else {
        return None;
    };
    Cidr::parse(&format!("10.{}.240.0/20", v4.octets()[1])).ok()
}
