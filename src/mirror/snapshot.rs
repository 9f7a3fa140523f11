// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace-agnostic copies of source objects.

use crate::error::Result;
use crate::kubernetes::ClusterApi;
use crate::types::{MirrorPayload, ResourceKind};
use tracing::{debug, instrument};

/// Sanitized copy of a source object, ready to be created in any namespace.
///
/// `namespace` and `resourceVersion` are always cleared; every other field is
/// kept as read from the source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceSnapshot {
    payload: MirrorPayload,
}

impl SourceSnapshot {
    /// Read the source object and strip its namespace identity.
    ///
    /// Always hits the cluster; snapshots are never cached between calls.
    #[instrument(skip(api))]
    pub async fn fetch(
        api: &dyn ClusterApi,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
    ) -> Result<Self> {
        let payload = api.get_object(kind, name, namespace).await?;
        debug!("Fetched source {} {}/{}", kind, namespace, name);
        Ok(Self::from_source(payload))
    }

    pub fn from_source(mut payload: MirrorPayload) -> Self {
        let meta = payload.metadata_mut();
        meta.namespace = None;
        meta.resource_version = None;
        Self { payload }
    }

    pub fn payload(&self) -> &MirrorPayload {
        &self.payload
    }

    pub fn kind(&self) -> ResourceKind {
        self.payload.kind()
    }

    pub fn name(&self) -> String {
        self.payload.name()
    }
}
