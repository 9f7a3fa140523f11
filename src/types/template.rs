// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::core::ClusterResourceScope;
use kube::{CustomResource, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object a template mirrors
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ConfigMap,
    Secret,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::ConfigMap, ResourceKind::Secret];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::ConfigMap => f.write_str("ConfigMap"),
            ResourceKind::Secret => f.write_str("Secret"),
        }
    }
}

/// Mirrors a ConfigMap into every selected namespace
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "genesis-mining.com", version = "v1beta1", kind = "ClusterConfigMap")]
#[kube(shortname = "ccm")]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfigMapSpec {
    /// Name of the source ConfigMap
    pub name: String,
    /// Namespace of the source ConfigMap
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_namespaces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_namespaces: Option<Vec<String>>,
}

/// Mirrors a Secret into every selected namespace
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "genesis-mining.com", version = "v1beta1", kind = "ClusterSecret")]
#[kube(shortname = "csec")]
#[serde(rename_all = "camelCase")]
pub struct ClusterSecretSpec {
    /// Name of the source Secret
    pub name: String,
    /// Namespace of the source Secret
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_namespaces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_namespaces: Option<Vec<String>>,
}

/// A template as the mirroring engine sees it, rebuilt from its custom resource on every event.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeclaration {
    pub identity: String,
    pub kind: ResourceKind,
    pub source_name: String,
    pub source_namespace: String,
    #[serde(default)]
    pub include_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl TemplateDeclaration {
    pub fn new(
        identity: impl Into<String>,
        kind: ResourceKind,
        source_name: impl Into<String>,
        source_namespace: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            kind,
            source_name: source_name.into(),
            source_namespace: source_namespace.into(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    pub fn with_patterns(mut self, include: Vec<String>, exclude: Vec<String>) -> Self {
        self.include_patterns = include;
        self.exclude_patterns = exclude;
        self
    }

    /// Source coordinates as `namespace/name`
    pub fn source_ref(&self) -> String {
        format!("{}/{}", self.source_namespace, self.source_name)
    }
}

/// Custom resource kinds that declare a template
pub trait TemplateResource:
    Resource<DynamicType = (), Scope = ClusterResourceScope>
    + Clone
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    const KIND: ResourceKind;

    fn declaration(&self) -> TemplateDeclaration;
}

impl TemplateResource for ClusterConfigMap {
    const KIND: ResourceKind = ResourceKind::ConfigMap;

    fn declaration(&self) -> TemplateDeclaration {
        TemplateDeclaration::new(
            self.name_any(),
            Self::KIND,
            &self.spec.name,
            &self.spec.namespace,
        )
        .with_patterns(
            self.spec.include_namespaces.clone().unwrap_or_default(),
            self.spec.exclude_namespaces.clone().unwrap_or_default(),
        )
    }
}

impl TemplateResource for ClusterSecret {
    const KIND: ResourceKind = ResourceKind::Secret;

    fn declaration(&self) -> TemplateDeclaration {
        TemplateDeclaration::new(
            self.name_any(),
            Self::KIND,
            &self.spec.name,
            &self.spec.namespace,
        )
        .with_patterns(
            self.spec.include_namespaces.clone().unwrap_or_default(),
            self.spec.exclude_namespaces.clone().unwrap_or_default(),
        )
    }
}
