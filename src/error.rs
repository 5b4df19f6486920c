// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetscoutError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to create Kubernetes client: {0}")]
    ClientError(String),

    #[error("Invalid CIDR {0}: {1}")]
    InvalidCidr(String, String),

    #[error("Metadata request failed: {0}")]
    MetadataError(#[from] reqwest::Error),

    #[error("Failed to parse kube-env metadata: {0}")]
    KubeEnvError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, NetscoutError>;
