// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service range probing with throwaway ClusterIP Services

use crate::config::ProbeSettings;
use crate::constants::probe::{ALLOCATED_ERR, POLL_INTERVAL_MILLIS, POLL_MAX_INTERVAL_MILLIS};
use crate::net::{offset, Cidr};
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    Api, Client,
};
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

/// Creates and deletes a single well-known Service to find out which cluster IPs
/// the API server accepts.
///
/// Not safe to run concurrently against the same cluster: every prober shares the
/// configured Service name.
pub struct ServiceProber {
    api: Api<Service>,
    settings: ProbeSettings,
}

impl ServiceProber {
    pub fn new(client: Client, settings: ProbeSettings) -> Self {
        let api = Api::namespaced(client, &settings.namespace);
        Self { api, settings }
    }

    /// Try to create the probe Service at `target` (or anywhere, if `None`).
    ///
    /// Returns the address the Service received, or `None` when the API server
    /// refused it. With `ignore_allocated`, an "already allocated" rejection counts
    /// as success and `target` is returned.
    #[instrument(skip(self), fields(service = %self.settings.name))]
    pub async fn probe(&self, target: Option<IpAddr>, ignore_allocated: bool) -> Option<IpAddr> {
        match self.try_probe(target).await {
            Ok(ip) => ip,
            Err(kube::Error::Api(err))
                if ignore_allocated && err.message.contains(ALLOCATED_ERR) =>
            {
                debug!(
                    "{} is already allocated, counting it as in range",
                    fmt_target(target)
                );
                target
            }
            Err(e) => {
                warn!("Error with {}: {}", fmt_target(target), e);
                None
            }
        }
    }

    /// Check that `cidr` is exactly the range the cluster hands out service IPs from.
    ///
    /// The address below the block and the one above it must be refused, while the
    /// second and the second-to-last addresses must be accepted.
    #[instrument(skip(self))]
    pub async fn confirm_range(&self, cidr: &Cidr) -> bool {
        let first = cidr.network();
        let last = cidr.last();
        let checks = [
            (offset(first, -1), false),
            // the network address itself is never handed out, so test one above it
            (offset(first, 1), true),
            (offset(last, -1), true),
            (offset(last, 1), false),
        ];

        for (candidate, expected) in checks {
            let in_range = match candidate {
                Some(ip) => self.probe(Some(ip), true).await.is_some(),
                None => false,
            };
            if in_range != expected {
                info!(
                    "Service range {} not confirmed: {} was {}",
                    cidr,
                    fmt_target(candidate),
                    if in_range { "accepted" } else { "refused" }
                );
                return false;
            }
        }

        info!("Confirmed service range {}", cidr);
        true
    }

    async fn try_probe(&self, target: Option<IpAddr>) -> Result<Option<IpAddr>, kube::Error> {
        self.delete_probe().await?;

        let created = self
            .api
            .create(&PostParams::default(), &self.probe_service(target))
            .await?;
        let assigned = match assigned_ip(&created) {
            Some(ip) => Some(ip),
            None => self.wait_for_assignment().await,
        };

        if let Err(e) = self.delete_probe().await {
            warn!("Failed to clean up probe service {}: {}", self.settings.name, e);
        }

        Ok(assigned.or(target))
    }

    /// Delete the probe Service, treating "not found" as done
    async fn delete_probe(&self) -> Result<(), kube::Error> {
        match self
            .api
            .delete(&self.settings.name, &DeleteParams::default())
            .await
        {
            Ok(_) => {
                debug!("Deleted probe service {}", self.settings.name);
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Poll the probe Service until the cluster fills in its cluster IP.
    /// Backs off exponentially and gives up after the configured timeout.
    async fn wait_for_assignment(&self) -> Option<IpAddr> {
        let poll = async {
            let mut interval = POLL_INTERVAL_MILLIS;
            loop {
                sleep(Duration::from_millis(interval)).await;
                match self.api.get(&self.settings.name).await {
                    Ok(svc) => {
                        if let Some(ip) = assigned_ip(&svc) {
                            return ip;
                        }
                    }
                    Err(e) => debug!("Probe service not readable yet: {}", e),
                }
                interval = (interval * 2).min(POLL_MAX_INTERVAL_MILLIS);
            }
        };

        match timeout(self.settings.assign_timeout, poll).await {
            Ok(ip) => Some(ip),
            Err(_) => {
                warn!(
                    "No cluster IP assigned to {} within {:?}",
                    self.settings.name, self.settings.assign_timeout
                );
                None
            }
        }
    }

    fn probe_service(&self, target: Option<IpAddr>) -> Service {
        Service {
            metadata: ObjectMeta {
                name: Some(self.settings.name.clone()),
                namespace: Some(self.settings.namespace.clone()),
                ..Default::default()
            },
            spec: Some(ServiceSpec {
                type_: Some("ClusterIP".to_string()),
                cluster_ip: target.map(|ip| ip.to_string()),
                ports: Some(vec![ServicePort {
                    protocol: Some("UDP".to_string()),
                    port: self.settings.port,
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

fn assigned_ip(svc: &Service) -> Option<IpAddr> {
    svc.spec
        .as_ref()
        .and_then(|s| s.cluster_ip.as_deref())
        .and_then(|ip| ip.parse().ok())
}

fn fmt_target(ip: Option<IpAddr>) -> String {
    ip.map_or_else(|| "<auto>".to_string(), |ip| ip.to_string())
}
