// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Creation and removal of mirrored objects, per namespace and across all namespaces.

use crate::error::{MirrorError, Result};
use crate::kubernetes::ClusterApi;
use crate::mirror::spec::MirrorSpecification;
use crate::types::TemplateDeclaration;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Result of mirroring into one namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The selector rejected the namespace
    Skipped,
}

/// Result of removing a mirror from one namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Absent,
    /// The namespace holds the source object, which is never deleted
    SourceRetained,
}

/// A namespace where a mirror write failed, and why
#[derive(Debug)]
pub struct NamespaceFailure {
    pub namespace: String,
    pub error: MirrorError,
}

/// Per-namespace results of an apply fan-out
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    /// Namespaces that already held an object with the mirrored name
    pub conflicts: Vec<String>,
    pub failures: Vec<NamespaceFailure>,
}

/// Per-namespace results of a removal fan-out
#[derive(Debug, Default)]
pub struct RemoveReport {
    pub removed: Vec<String>,
    pub absent: Vec<String>,
    pub retained: Vec<String>,
    pub failures: Vec<NamespaceFailure>,
}

/// Issues mirror writes against the cluster, one namespace at a time
#[derive(Clone)]
pub struct MirrorExecutor {
    api: Arc<dyn ClusterApi>,
}

impl MirrorExecutor {
    pub fn new(api: Arc<dyn ClusterApi>) -> Self {
        Self { api }
    }

    /// Create the snapshot in `namespace` if the selector allows it.
    ///
    /// An existing object with the same name is reported as `Conflict`.
    #[instrument(skip(self, spec), fields(template = %spec.declaration().identity))]
    pub async fn apply_to_namespace(
        &self,
        spec: &MirrorSpecification,
        namespace: &str,
    ) -> Result<ApplyOutcome> {
        if !spec.selects(namespace) {
            debug!("Namespace {} not selected", namespace);
            return Ok(ApplyOutcome::Skipped);
        }

        self.api
            .create_object(namespace, spec.snapshot().payload())
            .await?;
        Ok(ApplyOutcome::Applied)
    }

    /// Mirror into every current namespace; only the namespace listing can fail the call
    #[instrument(skip(self, spec), fields(template = %spec.declaration().identity))]
    pub async fn apply_to_all_namespaces(&self, spec: &MirrorSpecification) -> Result<ApplyReport> {
        let namespaces = self.api.list_namespaces().await?;
        let mut report = ApplyReport::default();
        let decl = spec.declaration();

        for namespace in namespaces {
            match self.apply_to_namespace(spec, &namespace).await {
                Ok(ApplyOutcome::Applied) => {
                    info!(
                        "Mirrored {} {} into namespace {}",
                        decl.kind,
                        decl.source_ref(),
                        namespace
                    );
                    report.applied.push(namespace);
                }
                Ok(ApplyOutcome::Skipped) => report.skipped.push(namespace),
                Err(MirrorError::Conflict(msg)) => {
                    info!("{} already present in {}: {}", decl.source_name, namespace, msg);
                    report.conflicts.push(namespace);
                }
                Err(e) => {
                    error!(
                        "Failed to mirror {} {} into namespace {}: {}",
                        decl.kind,
                        decl.source_ref(),
                        namespace,
                        e
                    );
                    report.failures.push(NamespaceFailure {
                        namespace,
                        error: e,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Delete the mirror named after the source object; a missing object is `Absent`.
    ///
    /// The source namespace and any namespace in `retained` are never touched.
    #[instrument(skip(self, declaration, retained), fields(template = %declaration.identity))]
    pub async fn remove_from_namespace(
        &self,
        declaration: &TemplateDeclaration,
        namespace: &str,
        retained: &[String],
    ) -> Result<RemoveOutcome> {
        if namespace == declaration.source_namespace || retained.iter().any(|ns| ns == namespace) {
            return Ok(RemoveOutcome::SourceRetained);
        }

        match self
            .api
            .delete_object(declaration.kind, &declaration.source_name, namespace)
            .await
        {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(MirrorError::NotFound(_)) => Ok(RemoveOutcome::Absent),
            Err(e) => Err(e),
        }
    }

    /// Remove mirrors from every current namespace; only the namespace listing can fail the call
    #[instrument(skip(self, declaration, retained), fields(template = %declaration.identity))]
    pub async fn remove_from_all_namespaces(
        &self,
        declaration: &TemplateDeclaration,
        retained: &[String],
    ) -> Result<RemoveReport> {
        let namespaces = self.api.list_namespaces().await?;
        let mut report = RemoveReport::default();

        for namespace in namespaces {
            match self
                .remove_from_namespace(declaration, &namespace, retained)
                .await
            {
                Ok(RemoveOutcome::Removed) => {
                    info!(
                        "Removed mirrored {} {} from namespace {}",
                        declaration.kind, declaration.source_name, namespace
                    );
                    report.removed.push(namespace);
                }
                Ok(RemoveOutcome::Absent) => report.absent.push(namespace),
                Ok(RemoveOutcome::SourceRetained) => report.retained.push(namespace),
                Err(e) => {
                    error!(
                        "Failed to remove mirrored {} {} from namespace {}: {}",
                        declaration.kind, declaration.source_name, namespace, e
                    );
                    report.failures.push(NamespaceFailure {
                        namespace,
                        error: e,
                    });
                }
            }
        }

        Ok(report)
    }
}
