// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! resolv.conf settings forwarded to VPN clients

use hickory_resolver::system_conf::parse_resolv_conf;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Resolver settings the gateway forwards to its clients
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsConfig {
    pub nameservers: Vec<String>,
    pub search: Vec<String>,
}

impl DnsConfig {
    /// Read a resolver file. An unreadable or malformed file yields an empty config.
    pub async fn load(path: &Path) -> Self {
        match fs::read(path).await {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                debug!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(contents: impl AsRef<[u8]>) -> Self {
        let (config, _) = match parse_resolv_conf(contents) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Ignoring unparsable resolver configuration: {}", e);
                return Self::default();
            }
        };

        // hickory lists every server once per protocol
        let mut nameservers: Vec<String> = Vec::new();
        for server in config.name_servers() {
            let ip = server.socket_addr.ip().to_string();
            if !nameservers.contains(&ip) {
                nameservers.push(ip);
            }
        }

        let search = config
            .search()
            .iter()
            .map(|name| name.to_string().trim_end_matches('.').to_string())
            .collect();

        Self {
            nameservers,
            search,
        }
    }

    pub fn first_nameserver(&self) -> Option<&str> {
        self.nameservers.first().map(String::as_str)
    }
}
