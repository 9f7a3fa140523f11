// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster API capabilities used by the mirroring engine, and their kube-backed implementation.

use crate::error::Result;
use crate::types::{
    ClusterConfigMap, ClusterSecret, MirrorPayload, ResourceKind, TemplateDeclaration,
    TemplateResource,
};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Secret};
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{debug, instrument};

/// Everything the engine needs from the cluster.
///
/// Errors are reported in the engine's own taxonomy (`NotFound`, `Conflict`,
/// `Unauthorized`, `Unavailable`) so callers can decide what to tolerate.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Read an object of `kind`
    async fn get_object(
        &self,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
    ) -> Result<MirrorPayload>;

    /// Create `payload` in `namespace`; an existing object yields `Conflict`
    async fn create_object(&self, namespace: &str, payload: &MirrorPayload) -> Result<()>;

    /// Delete an object of `kind`; a missing object yields `NotFound`
    async fn delete_object(&self, kind: ResourceKind, name: &str, namespace: &str) -> Result<()>;

    /// Names of all namespaces, in listing order
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    /// All template declarations of `kind`, in listing order
    async fn list_templates(&self, kind: ResourceKind) -> Result<Vec<TemplateDeclaration>>;
}

/// `ClusterApi` backed by a Kubernetes client
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list_declarations<K: TemplateResource>(&self) -> Result<Vec<TemplateDeclaration>> {
        let api: Api<K> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(K::declaration).collect())
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    #[instrument(skip(self))]
    async fn get_object(
        &self,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
    ) -> Result<MirrorPayload> {
        let payload: MirrorPayload = match kind {
            ResourceKind::ConfigMap => {
                let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
                api.get(name).await?.into()
            }
            ResourceKind::Secret => {
                let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
                api.get(name).await?.into()
            }
        };
        Ok(payload)
    }

    #[instrument(skip(self, payload), fields(kind = %payload.kind(), name = %payload.name()))]
    async fn create_object(&self, namespace: &str, payload: &MirrorPayload) -> Result<()> {
        let pp = PostParams::default();
        match payload {
            MirrorPayload::ConfigMap(cm) => {
                let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
                api.create(&pp, cm).await?;
            }
            MirrorPayload::Secret(secret) => {
                let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
                api.create(&pp, secret).await?;
            }
        }
        debug!("Created {} {}/{}", payload.kind(), namespace, payload.name());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_object(&self, kind: ResourceKind, name: &str, namespace: &str) -> Result<()> {
        let dp = DeleteParams::default();
        match kind {
            ResourceKind::ConfigMap => {
                let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
                api.delete(name, &dp).await?;
            }
            ResourceKind::Secret => {
                let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
                api.delete(name, &dp).await?;
            }
        }
        debug!("Deleted {} {}/{}", kind, namespace, name);
        Ok(())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(|ns| ns.name_any()).collect())
    }

    async fn list_templates(&self, kind: ResourceKind) -> Result<Vec<TemplateDeclaration>> {
        match kind {
            ResourceKind::ConfigMap => self.list_declarations::<ClusterConfigMap>().await,
            ResourceKind::Secret => self.list_declarations::<ClusterSecret>().await,
        }
    }
}
