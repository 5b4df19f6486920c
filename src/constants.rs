// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables consumed and exported for the gateway container
pub mod env {
    pub const OVPN_HOST: &str = "OVPN_HOST";
    pub const KUBE_DNS: &str = "KUBE_DNS";
    pub const KUBE_DNS_SEARCH: &str = "KUBE_DNS_SEARCH";
    /// Bash array form of the DNS search path
    pub const DNS_SEARCH_ARR: &str = "DNS_SEARCH_ARR";
    pub const KUBE_SVC_NET: &str = "KUBE_SVC_NET";
    pub const KUBE_SVC_MASK: &str = "KUBE_SVC_MASK";
    pub const KUBE_POD_NET: &str = "KUBE_POD_NET";
    pub const KUBE_POD_MASK: &str = "KUBE_POD_MASK";

    /// Every variable the exporter knows about, in output order
    pub const ALL: [&str; 8] = [
        KUBE_DNS,
        KUBE_DNS_SEARCH,
        DNS_SEARCH_ARR,
        KUBE_SVC_NET,
        KUBE_SVC_MASK,
        KUBE_POD_NET,
        KUBE_POD_MASK,
        OVPN_HOST,
    ];
}

/// Probe service settings
pub mod probe {
    /// Name of the throwaway Service used to test address allocation
    pub const SERVICE_NAME: &str = "openvpntest-ok-to-delete";
    pub const NAMESPACE: &str = "default";
    pub const PORT: i32 = 19555;
    /// Suffix of the API error returned when a requested cluster IP is taken
    pub const ALLOCATED_ERR: &str = "provided IP is already allocated";
    /// Upper bound for waiting on the cluster to assign a cluster IP
    pub const ASSIGN_TIMEOUT_SECS: u64 = 10;
    pub const POLL_INTERVAL_MILLIS: u64 = 100;
    pub const POLL_MAX_INTERVAL_MILLIS: u64 = 1600;
}

/// Provider detection and range heuristics
pub mod provider {
    pub const MINIKUBE_NODE_NAME: &str = "minikubevm";
    pub const MINIKUBE_SERVICE_CIDR: &str = "10.0.0.0/24";
    /// kube-aws default, then kube-up.sh on AWS
    pub const AWS_SERVICE_CIDRS: [&str; 2] = ["10.3.0.0/24", "10.0.0.0/16"];
    pub const GCE_METADATA_URL: &str =
        "http://metadata.google.internal/computeMetadata/v1/instance/attributes/kube-env";
    pub const GCE_METADATA_HEADER: &str = "Metadata-Flavor";
    pub const GCE_METADATA_HEADER_VALUE: &str = "Google";
    pub const GCE_METADATA_TIMEOUT_SECS: u64 = 5;
}

/// Files read from the pod filesystem
pub mod paths {
    pub const SERVICEACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";
    pub const RESOLV_CONF: &str = "/etc/resolv.conf";
    pub const KERNEL_HOSTNAME: &str = "/proc/sys/kernel/hostname";
}
