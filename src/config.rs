// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{paths, probe, provider};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Settings for the throwaway Service used by the range prober
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSettings {
    pub name: String,
    pub namespace: String,
    pub port: i32,
    /// How long to wait for the cluster to fill in `spec.clusterIP`
    pub assign_timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            name: probe::SERVICE_NAME.to_string(),
            namespace: probe::NAMESPACE.to_string(),
            port: probe::PORT,
            assign_timeout: Duration::from_secs(probe::ASSIGN_TIMEOUT_SECS),
        }
    }
}

/// Run configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub probe: ProbeSettings,
    pub gce_metadata_url: Url,
    pub resolv_conf: PathBuf,
    /// Directory holding the mounted service account token and namespace
    pub serviceaccount_dir: PathBuf,
    /// Name of the pod we run in, used to find our node
    pub hostname: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = ProbeSettings::default();

        let port = match var("NETSCOUT_PROBE_PORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("NETSCOUT_PROBE_PORT is not a valid port: {}", v))?,
            None => defaults.port,
        };
        let assign_timeout = match var("NETSCOUT_ASSIGN_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse().with_context(|| {
                format!("NETSCOUT_ASSIGN_TIMEOUT_SECS is not a number: {}", v)
            })?),
            None => defaults.assign_timeout,
        };
        let probe = ProbeSettings {
            name: var("NETSCOUT_PROBE_NAME").unwrap_or(defaults.name),
            namespace: var("NETSCOUT_PROBE_NAMESPACE").unwrap_or(defaults.namespace),
            port,
            assign_timeout,
        };

        let metadata_url = var("NETSCOUT_GCE_METADATA_URL")
            .unwrap_or_else(|| provider::GCE_METADATA_URL.to_string());
        let gce_metadata_url = Url::parse(&metadata_url).with_context(|| {
            format!("NETSCOUT_GCE_METADATA_URL is not a URL: {}", metadata_url)
        })?;

        let resolv_conf = var("NETSCOUT_RESOLV_CONF")
            .unwrap_or_else(|| paths::RESOLV_CONF.to_string())
            .into();
        let serviceaccount_dir = var("NETSCOUT_SERVICEACCOUNT_DIR")
            .unwrap_or_else(|| paths::SERVICEACCOUNT_DIR.to_string())
            .into();

        // Kubernetes sets HOSTNAME to the pod name; the kernel file covers shells that unset it
        let hostname = var("HOSTNAME").or_else(|| {
            std::fs::read_to_string(paths::KERNEL_HOSTNAME)
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        });

        Ok(Config {
            probe,
            gce_metadata_url,
            resolv_conf,
            serviceaccount_dir,
            hostname,
        })
    }
}
