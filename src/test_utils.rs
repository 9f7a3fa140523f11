// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mock HTTP service backing a real kube `Client`, and an
//! in-memory `ClusterApi` for engine tests.

use crate::error::{MirrorError, Result};
use crate::kubernetes::ClusterApi;
use crate::types::{MirrorPayload, ResourceKind, TemplateDeclaration};
use async_trait::async_trait;
use http::{Request, Response};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Clones share state, so a clone kept by the test sees every request made
/// through the client.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for DELETE requests matching the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Method and path of every request received so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
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
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let key = (req.method().to_string(), req.uri().path().to_string());
        let response = self.responses.lock().unwrap().get(&key).cloned();
        self.requests.lock().unwrap().push(key);

        Box::pin(async move {
            // Unmatched requests are answered with 404
            let (status, body) =
                response.unwrap_or_else(|| (404, status_json(404, "NotFound", "not found")));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON object
pub fn namespace_json(name: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
}

/// Create a mock ConfigMap JSON response
pub fn config_map_json(name: &str, namespace: &str, resource_version: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": resource_version
        },
        "data": { "key": "value" }
    })
    .to_string()
}

/// Wrap items in a list response
pub fn list_json(api_version: &str, kind: &str, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
    .to_string()
}

/// Create a failure Status response
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

pub fn make_config_map(name: &str, namespace: &str) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            resource_version: Some("100".to_string()),
            labels: Some(BTreeMap::from([("app".to_string(), "shared".to_string())])),
            ..Default::default()
        },
        data: Some(BTreeMap::from([("key".to_string(), "value".to_string())])),
        ..Default::default()
    }
}

pub fn make_secret(name: &str, namespace: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            resource_version: Some("200".to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            "tls.crt".to_string(),
            ByteString("certificate".as_bytes().to_vec()),
        )])),
        type_: Some("kubernetes.io/tls".to_string()),
        ..Default::default()
    }
}

/// Operations a `FakeCluster` can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Create,
    Delete,
}

/// Failures a `FakeCluster` can inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unavailable,
    Unauthorized,
}

impl Failure {
    fn error(self, what: &str) -> MirrorError {
        match self {
            Failure::Unavailable => MirrorError::Unavailable(format!("{}: connection refused", what)),
            Failure::Unauthorized => MirrorError::Unauthorized(format!("{}: forbidden", what)),
        }
    }
}

/// A recorded call against the fake cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get { namespace: String, name: String },
    Create { namespace: String, name: String },
    Delete { namespace: String, name: String },
    ListNamespaces,
    ListTemplates(ResourceKind),
}

type ObjectKey = (ResourceKind, String, String);

#[derive(Default)]
struct FakeState {
    namespaces: Vec<String>,
    objects: BTreeMap<ObjectKey, MirrorPayload>,
    templates: Vec<TemplateDeclaration>,
    failures: HashMap<(Op, String), Failure>,
    list_namespaces_failure: Option<Failure>,
    list_templates_failure: Option<Failure>,
    calls: Vec<Call>,
    next_resource_version: u64,
}

/// In-memory cluster that behaves like the API server for the calls the engine makes
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCluster {
    pub fn new(namespaces: &[&str]) -> Self {
        let cluster = Self::default();
        cluster.state.lock().unwrap().namespaces =
            namespaces.iter().map(|s| s.to_string()).collect();
        cluster
    }

    pub fn with_object(self, payload: impl Into<MirrorPayload>) -> Self {
        let payload = payload.into();
        let namespace = payload.metadata().namespace.clone().unwrap_or_default();
        let key = (payload.kind(), namespace, payload.name());
        self.state.lock().unwrap().objects.insert(key, payload);
        self
    }

    pub fn with_template(self, declaration: TemplateDeclaration) -> Self {
        self.state.lock().unwrap().templates.push(declaration);
        self
    }

    /// Make `op` fail in `namespace`
    pub fn failing(self, op: Op, namespace: &str, failure: Failure) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op, namespace.to_string()), failure);
        self
    }

    pub fn failing_list_namespaces(self, failure: Failure) -> Self {
        self.state.lock().unwrap().list_namespaces_failure = Some(failure);
        self
    }

    pub fn failing_list_templates(self, failure: Failure) -> Self {
        self.state.lock().unwrap().list_templates_failure = Some(failure);
        self
    }

    pub fn add_namespace(&self, namespace: &str) {
        self.state.lock().unwrap().namespaces.push(namespace.to_string());
    }

    pub fn object(&self, kind: ResourceKind, namespace: &str, name: &str) -> Option<MirrorPayload> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&(kind, namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Namespaces holding an object of `kind` named `name`, sorted
    pub fn namespaces_with(&self, kind: ResourceKind, name: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .objects
            .keys()
            .filter(|(k, _, n)| *k == kind && n == name)
            .map(|(_, ns, _)| ns.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn create_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { namespace, .. } => Some(namespace),
                _ => None,
            })
            .collect()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete { namespace, .. } => Some(namespace),
                _ => None,
            })
            .collect()
    }
}

impl FakeState {
    fn check(&self, op: Op, namespace: &str) -> Result<()> {
        match self.failures.get(&(op, namespace.to_string())) {
            Some(failure) => Err(failure.error(namespace)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn get_object(
        &self,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
    ) -> Result<MirrorPayload> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Get {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        state.check(Op::Get, namespace)?;
        state
            .objects
            .get(&(kind, namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| MirrorError::NotFound(format!("{} {}/{}", kind, namespace, name)))
    }

    async fn create_object(&self, namespace: &str, payload: &MirrorPayload) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            namespace: namespace.to_string(),
            name: payload.name(),
        });
        state.check(Op::Create, namespace)?;

        let meta = payload.metadata();
        if meta.resource_version.is_some() {
            return Err(MirrorError::Unavailable(
                "resourceVersion should not be set on objects to be created".to_string(),
            ));
        }
        if meta.namespace.as_deref().is_some_and(|ns| ns != namespace) {
            return Err(MirrorError::Unavailable(
                "the namespace of the provided object does not match the namespace sent on the request"
                    .to_string(),
            ));
        }

        let key = (payload.kind(), namespace.to_string(), payload.name());
        if state.objects.contains_key(&key) {
            return Err(MirrorError::Conflict(format!(
                "{} {}/{} already exists",
                key.0, key.1, key.2
            )));
        }

        state.next_resource_version += 1;
        let mut stored = payload.clone();
        let meta = stored.metadata_mut();
        meta.namespace = Some(namespace.to_string());
        meta.resource_version = Some(state.next_resource_version.to_string());
        state.objects.insert(key, stored);
        Ok(())
    }

    async fn delete_object(&self, kind: ResourceKind, name: &str, namespace: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        state.check(Op::Delete, namespace)?;
        state
            .objects
            .remove(&(kind, namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| MirrorError::NotFound(format!("{} {}/{}", kind, namespace, name)))
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListNamespaces);
        if let Some(failure) = state.list_namespaces_failure {
            return Err(failure.error("namespaces"));
        }
        Ok(state.namespaces.clone())
    }

    async fn list_templates(&self, kind: ResourceKind) -> Result<Vec<TemplateDeclaration>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListTemplates(kind));
        if let Some(failure) = state.list_templates_failure {
            return Err(failure.error("templates"));
        }
        Ok(state
            .templates
            .iter()
            .filter(|t| t.kind == kind)
            .cloned()
            .collect())
    }
}
