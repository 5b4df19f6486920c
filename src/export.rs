// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Shell export block for the gateway container

use crate::constants::env;
use crate::net::Cidr;
use crate::resolv::DnsConfig;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Snapshot of the variables the exporter cares about
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self::from_pairs(
            std::env::vars().filter(|(k, _)| env::ALL.contains(&k.as_str())),
        )
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, treating empty as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Everything the run found out about the cluster
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    pub dns: DnsConfig,
    pub service_cidr: Option<Cidr>,
    pub pod_cidr: Option<Cidr>,
    pub external_ip: Option<String>,
}

/// Render `export` lines for every value the environment does not already provide
pub fn render_exports(environment: &Environment, found: &Discovered) -> String {
    let mut out = String::new();

    emit(
        &mut out,
        environment,
        env::KUBE_DNS,
        found.dns.first_nameserver().map(str::to_string),
    );
    emit(
        &mut out,
        environment,
        env::KUBE_DNS_SEARCH,
        Some(found.dns.search.join(" ")).filter(|s| !s.is_empty()),
    );

    // the array follows whichever search path the gateway will actually use
    let search: Vec<String> = match environment.get(env::KUBE_DNS_SEARCH) {
        Some(preset) => preset.split_whitespace().map(str::to_string).collect(),
        None => found.dns.search.clone(),
    };
    if environment.get(env::DNS_SEARCH_ARR).is_none() && !search.is_empty() {
        let items: Vec<String> = search.iter().map(|d| shell_quote(d)).collect();
        out.push_str(&format!(
            "export {}=({})\n",
            env::DNS_SEARCH_ARR,
            items.join(" ")
        ));
    }

    emit(
        &mut out,
        environment,
        env::KUBE_SVC_NET,
        found.service_cidr.map(|c| c.network().to_string()),
    );
    emit(
        &mut out,
        environment,
        env::KUBE_SVC_MASK,
        found.service_cidr.map(|c| c.netmask().to_string()),
    );
    emit(
        &mut out,
        environment,
        env::KUBE_POD_NET,
        found.pod_cidr.map(|c| c.network().to_string()),
    );
    emit(
        &mut out,
        environment,
        env::KUBE_POD_MASK,
        found.pod_cidr.map(|c| c.netmask().to_string()),
    );
    emit(&mut out, environment, env::OVPN_HOST, found.external_ip.clone());

    out
}

/// Append one assignment unless the environment already provides `key`
fn emit(out: &mut String, environment: &Environment, key: &str, value: Option<String>) {
    if let Some(existing) = environment.get(key) {
        debug!("{} already set to {}, not exporting", key, existing);
        return;
    }
    match value {
        Some(value) => {
            info!("Exporting {}={}", key, value);
            out.push_str(&format!("export {}={}\n", key, shell_quote(&value)));
        }
        None => debug!("No value found for {}", key),
    }
}

/// Double-quote a value for POSIX shells
fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
