// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Own-node lookup and cloud provider detection

use crate::constants::provider::MINIKUBE_NODE_NAME;
use crate::error::Result;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::{Api, Client};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Hosting provider, taken from the scheme of the node's `spec.providerID`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudProvider {
    Gce,
    Aws,
    Minikube,
    /// A providerID scheme we have no heuristics for
    Other(String),
    Unknown,
}

impl CloudProvider {
    /// Classify a node by name and providerID
    pub fn detect(node_name: &str, provider_id: Option<&str>) -> Self {
        if node_name == MINIKUBE_NODE_NAME {
            return CloudProvider::Minikube;
        }
        let Some(provider_id) = provider_id else {
            return CloudProvider::Unknown;
        };
        match provider_id.split("://").next().unwrap_or_default() {
            "gce" => CloudProvider::Gce,
            "aws" => CloudProvider::Aws,
            "" => CloudProvider::Unknown,
            other => CloudProvider::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudProvider::Gce => write!(f, "gce"),
            CloudProvider::Aws => write!(f, "aws"),
            CloudProvider::Minikube => write!(f, "minikube"),
            CloudProvider::Other(p) => write!(f, "{}", p),
            CloudProvider::Unknown => write!(f, "unknown"),
        }
    }
}

/// What the run learns about the node hosting this pod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFacts {
    pub name: Option<String>,
    pub provider: CloudProvider,
    pub pod_cidr: Option<String>,
    pub external_ip: Option<String>,
}

impl NodeFacts {
    pub fn unknown() -> Self {
        Self {
            name: None,
            provider: CloudProvider::Unknown,
            pod_cidr: None,
            external_ip: None,
        }
    }

    pub fn from_node(node: &Node) -> Self {
        let name = node.metadata.name.clone().unwrap_or_default();
        let spec = node.spec.as_ref();
        let provider = CloudProvider::detect(&name, spec.and_then(|s| s.provider_id.as_deref()));
        let pod_cidr = spec.and_then(|s| s.pod_cidr.clone());
        let external_ip = node
            .status
            .as_ref()
            .and_then(|s| s.addresses.as_ref())
            .and_then(|addrs| addrs.iter().find(|a| a.type_ == "ExternalIP"))
            .map(|a| a.address.clone());

        Self {
            name: Some(name),
            provider,
            pod_cidr,
            external_ip,
        }
    }
}

/// Namespace of the running pod from the mounted service account
pub fn pod_namespace(serviceaccount_dir: &Path) -> String {
    match std::fs::read_to_string(serviceaccount_dir.join("namespace")) {
        Ok(ns) if !ns.trim().is_empty() => ns.trim().to_string(),
        Ok(_) => "default".to_string(),
        Err(e) => {
            debug!("Service account namespace unreadable, using default: {}", e);
            "default".to_string()
        }
    }
}

/// Look up the node our pod is scheduled on.
///
/// Lookup failures and missing fields degrade to [`NodeFacts::unknown`].
#[instrument(skip(client))]
pub async fn detect_node(client: &Client, namespace: &str, hostname: Option<&str>) -> NodeFacts {
    let Some(hostname) = hostname else {
        warn!("Hostname unknown, cannot find own pod");
        return NodeFacts::unknown();
    };

    match lookup_node(client, namespace, hostname).await {
        Ok(Some(node)) => {
            let facts = NodeFacts::from_node(&node);
            info!(
                "Running on node {} (provider {})",
                facts.name.as_deref().unwrap_or_default(),
                facts.provider
            );
            facts
        }
        Ok(None) => {
            warn!("Pod {}/{} has no node assigned", namespace, hostname);
            NodeFacts::unknown()
        }
        Err(e) => {
            warn!("Could not look up node for pod {}/{}: {}", namespace, hostname, e);
            NodeFacts::unknown()
        }
    }
}

async fn lookup_node(client: &Client, namespace: &str, pod_name: &str) -> Result<Option<Node>> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let pod = pods.get(pod_name).await?;

    let Some(node_name) = pod.spec.and_then(|s| s.node_name) else {
        return Ok(None);
    };
    debug!("Pod {}/{} runs on node {}", namespace, pod_name, node_name);

    let nodes: Api<Node> = Api::all(client.clone());
    Ok(Some(nodes.get(&node_name).await?))
}
