// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provider-specific guesses for the service CIDR, validated by probing.

pub mod gce;

use crate::config::Config;
use crate::constants::provider::{AWS_SERVICE_CIDRS, MINIKUBE_SERVICE_CIDR};
use crate::kubernetes::{CloudProvider, ServiceProber};
use crate::net::Cidr;
use tracing::{debug, instrument, warn};

pub use gce::find_gce_range;

/// Pick and validate a service CIDR for the detected provider
#[instrument(skip(prober, config))]
pub async fn find_services_cidr(
    prober: &ServiceProber,
    provider: &CloudProvider,
    config: &Config,
) -> Option<Cidr> {
    match provider {
        CloudProvider::Gce => find_gce_range(prober, &config.gce_metadata_url).await,
        CloudProvider::Aws => find_aws_range(prober).await,
        CloudProvider::Minikube => Cidr::parse(MINIKUBE_SERVICE_CIDR).ok(),
        other => {
            warn!("No service range heuristic for provider {}", other);
            None
        }
    }
}

/// Try the known AWS installer defaults in order
async fn find_aws_range(prober: &ServiceProber) -> Option<Cidr> {
    for candidate in AWS_SERVICE_CIDRS {
        let Ok(cidr) = Cidr::parse(candidate) else {
            continue;
        };
        debug!("Trying AWS service range {}", cidr);
        if prober.confirm_range(&cidr).await {
            return Some(cidr);
        }
    }
    None
}
