// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::net::Cidr;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::Service as KubeService;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Responder = Arc<dyn Fn(&[u8]) -> (u16, String) + Send + Sync>;

/// A mock HTTP service that returns predefined responses based on request method and path.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), Responder>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, fixed(status, body))
    }

    /// Add a response for POST requests matching the path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, fixed(status, body))
    }

    /// Add a POST handler that computes its response from the request body
    pub fn on_post_fn<F>(self, path: &str, f: F) -> Self
    where
        F: Fn(&[u8]) -> (u16, String) + Send + Sync + 'static,
    {
        self.on("POST", path, Arc::new(f))
    }

    /// Add a response for DELETE requests matching the path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, fixed(status, body))
    }

    fn on(self, method: &str, path: &str, responder: Responder) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), responder);
        self
    }

    /// Every (method, path) pair received so far, in order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_responder(&self, method: &str, path: &str) -> Option<Responder> {
        let responses = self.responses.lock().unwrap();

        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Longest registered prefix wins
        responses
            .iter()
            .filter(|((m, p), _)| m == method && path.starts_with(p.as_str()))
            .max_by_key(|((_, p), _)| p.len())
            .map(|(_, resp)| resp.clone())
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let responder = self.find_responder(&method, &path);

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            let (status, body) = match responder {
                Some(responder) => responder(&body),
                // Default 404 for unmatched requests
                None => (404, not_found_json("resource", &path)),
            };
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

fn fixed(status: u16, body: &str) -> Responder {
    let body = body.to_string();
    Arc::new(move |_| (status, body.clone()))
}

/// Fake service-IP allocator: accepts requests inside `range` and rejects the rest
/// the way the API server does.
#[derive(Clone)]
pub struct FakeAllocator {
    range: Cidr,
    taken: Vec<IpAddr>,
    auto: Option<IpAddr>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeAllocator {
    pub fn new(range: &str) -> Self {
        Self {
            range: Cidr::parse(range).unwrap(),
            taken: Vec::new(),
            auto: None,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mark an address as already allocated to another service
    pub fn with_taken(mut self, ip: &str) -> Self {
        self.taken.push(ip.parse().unwrap());
        self
    }

    /// Address handed out when the request leaves `clusterIP` empty
    pub fn with_auto(mut self, ip: &str) -> Self {
        self.auto = Some(ip.parse().unwrap());
        self
    }

    /// Cluster IPs requested so far; empty string means "let the cluster pick"
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn respond(&self, body: &[u8]) -> (u16, String) {
        let svc: KubeService = serde_json::from_slice(body).unwrap();
        let name = svc.metadata.name.clone().unwrap_or_default();
        let namespace = svc.metadata.namespace.clone().unwrap_or_default();
        let wanted = svc
            .spec
            .as_ref()
            .and_then(|s| s.cluster_ip.clone())
            .unwrap_or_default();
        self.requested.lock().unwrap().push(wanted.clone());

        if wanted.is_empty() {
            let ip = self.auto.map(|ip| ip.to_string());
            return (201, service_json(&name, &namespace, ip.as_deref()));
        }

        let ip: IpAddr = wanted.parse().unwrap();
        if !self.range.contains(&ip) {
            let message = format!(
                "Service \"{}\" is invalid: spec.clusterIPs: Invalid value: []string{{\"{}\"}}: failed to allocate IP {}: the provided IP ({}) is not in the valid range. The range of valid IPs is {}",
                name, ip, ip, ip, self.range
            );
            return (422, status_json(422, "Invalid", &message));
        }
        if self.taken.contains(&ip) {
            let message = format!(
                "Service \"{}\" is invalid: spec.clusterIPs: Invalid value: []string{{\"{}\"}}: failed to allocate IP {}: provided IP is already allocated",
                name, ip, ip
            );
            return (422, status_json(422, "Invalid", &message));
        }
        (201, service_json(&name, &namespace, Some(&wanted)))
    }
}

/// Create a mock Service JSON response
pub fn service_json(name: &str, namespace: &str, cluster_ip: Option<&str>) -> String {
    let mut spec = serde_json::json!({
        "type": "ClusterIP",
        "ports": [{ "protocol": "UDP", "port": 19555 }]
    });
    if let Some(ip) = cluster_ip {
        spec["clusterIP"] = serde_json::json!(ip);
    }
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        },
        "spec": spec
    })
    .to_string()
}

/// Create a mock Pod JSON response scheduled on `node_name`
pub fn pod_json(name: &str, namespace: &str, node_name: Option<&str>) -> String {
    let mut spec = serde_json::json!({ "containers": [{ "name": "openvpn" }] });
    if let Some(node) = node_name {
        spec["nodeName"] = serde_json::json!(node);
    }
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": { "name": name, "namespace": namespace },
        "spec": spec
    })
    .to_string()
}

/// Create a mock Node JSON response
pub fn node_json(
    name: &str,
    provider_id: Option<&str>,
    pod_cidr: Option<&str>,
    external_ip: Option<&str>,
) -> String {
    let mut spec = serde_json::json!({});
    if let Some(id) = provider_id {
        spec["providerID"] = serde_json::json!(id);
    }
    if let Some(cidr) = pod_cidr {
        spec["podCIDR"] = serde_json::json!(cidr);
    }
    let mut addresses = vec![serde_json::json!({ "type": "InternalIP", "address": "10.128.0.2" })];
    if let Some(ip) = external_ip {
        addresses.push(serde_json::json!({ "type": "ExternalIP", "address": ip }));
    }
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Node",
        "metadata": { "name": name },
        "spec": spec,
        "status": { "addresses": addresses }
    })
    .to_string()
}

/// Create a failure Status JSON response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}
