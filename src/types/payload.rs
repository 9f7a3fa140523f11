// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::ResourceKind;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::ObjectMeta;
use kube::ResourceExt;

/// Body of a mirrorable object
#[derive(Clone, Debug, PartialEq)]
pub enum MirrorPayload {
    ConfigMap(ConfigMap),
    Secret(Secret),
}

impl MirrorPayload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            MirrorPayload::ConfigMap(_) => ResourceKind::ConfigMap,
            MirrorPayload::Secret(_) => ResourceKind::Secret,
        }
    }

    pub fn name(&self) -> String {
        match self {
            MirrorPayload::ConfigMap(cm) => cm.name_any(),
            MirrorPayload::Secret(s) => s.name_any(),
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            MirrorPayload::ConfigMap(cm) => &cm.metadata,
            MirrorPayload::Secret(s) => &s.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut ObjectMeta {
        match self {
            MirrorPayload::ConfigMap(cm) => &mut cm.metadata,
            MirrorPayload::Secret(s) => &mut s.metadata,
        }
    }
}

impl From<ConfigMap> for MirrorPayload {
    fn from(cm: ConfigMap) -> Self {
        MirrorPayload::ConfigMap(cm)
    }
}

impl From<Secret> for MirrorPayload {
    fn from(secret: Secret) -> Self {
        MirrorPayload::Secret(secret)
    }
}
