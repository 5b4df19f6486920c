// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, node lookup, and service range probing.

pub mod client;
pub mod node;
pub mod probe;

pub use client::create_cluster_client;
pub use node::{detect_node, pod_namespace, CloudProvider, NodeFacts};
pub use probe::ServiceProber;
