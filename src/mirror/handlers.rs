// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Entry points for the four events the operator reacts to.
//!
//! Every handler rebuilds what it needs from the cluster; no state is kept
//! between invocations.

use crate::error::{MirrorError, Result};
use crate::kubernetes::ClusterApi;
use crate::mirror::executor::{ApplyOutcome, ApplyReport, MirrorExecutor, RemoveReport};
use crate::mirror::registry::list_all_declarations;
use crate::mirror::spec::MirrorSpecification;
use crate::types::TemplateDeclaration;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Result of an update, which runs as a removal followed by a fresh apply
#[derive(Debug)]
pub struct UpdateReport {
    pub removed: RemoveReport,
    pub applied: ApplyReport,
}

/// Result of mirroring every template into one new namespace
#[derive(Debug, Default)]
pub struct NamespaceReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub conflicts: Vec<String>,
    /// Templates that could not be mirrored, with the reason
    pub failures: Vec<(String, MirrorError)>,
}

/// The operator's event handlers, sharing one cluster connection
#[derive(Clone)]
pub struct MirrorHandlers {
    api: Arc<dyn ClusterApi>,
    executor: MirrorExecutor,
}

impl MirrorHandlers {
    pub fn new(api: Arc<dyn ClusterApi>) -> Self {
        let executor = MirrorExecutor::new(api.clone());
        Self { api, executor }
    }

    /// Snapshot the source and mirror it into every existing namespace.
    ///
    /// Per-namespace failures are logged and reported but do not fail the handler.
    #[instrument(skip(self, declaration), fields(template = %declaration.identity, source = %declaration.source_ref()))]
    pub async fn on_template_created(&self, declaration: &TemplateDeclaration) -> Result<ApplyReport> {
        info!("Template created, mirroring {} into all namespaces", declaration.kind);

        let spec = MirrorSpecification::build(self.api.as_ref(), declaration).await?;
        let report = self.executor.apply_to_all_namespaces(&spec).await?;

        info!(
            "Mirrored into {} namespaces ({} skipped, {} already present, {} failed)",
            report.applied.len(),
            report.skipped.len(),
            report.conflicts.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Remove the mirrors of `declaration` from every namespace except the source namespace.
    ///
    /// All namespaces are visited; if any removal failed the handler fails
    /// afterwards with `Incomplete` so the event is delivered again.
    #[instrument(skip(self, declaration), fields(template = %declaration.identity, source = %declaration.source_ref()))]
    pub async fn on_template_deleted(&self, declaration: &TemplateDeclaration) -> Result<RemoveReport> {
        info!("Template deleted, removing mirrored {}s", declaration.kind);
        self.remove_mirrors(declaration, &[]).await
    }

    async fn remove_mirrors(
        &self,
        declaration: &TemplateDeclaration,
        retained: &[String],
    ) -> Result<RemoveReport> {
        let report = self
            .executor
            .remove_from_all_namespaces(declaration, retained)
            .await?;

        if !report.failures.is_empty() {
            return Err(MirrorError::Incomplete {
                operation: "mirror removal",
                failed: report.failures.len(),
            });
        }

        info!(
            "Removed from {} namespaces ({} already absent)",
            report.removed.len(),
            report.absent.len()
        );
        Ok(report)
    }

    /// Delete-then-create. Not atomic: if the create half fails, the template
    /// stays unmirrored everywhere until the next event.
    ///
    /// The delete half never removes the current source object, even when the
    /// source moved to a namespace that held a mirror of the previous one.
    #[instrument(skip(self, previous, current), fields(template = %current.identity))]
    pub async fn on_template_updated(
        &self,
        previous: &TemplateDeclaration,
        current: &TemplateDeclaration,
    ) -> Result<UpdateReport> {
        let mut retained = Vec::new();
        if current.kind == previous.kind && current.source_name == previous.source_name {
            retained.push(current.source_namespace.clone());
        }

        info!("Template updated, removing mirrors of {}", previous.source_ref());
        let removed = self.remove_mirrors(previous, &retained).await?;
        debug!("Previous mirrors removed, recreating from {}", current.source_ref());
        let applied = self.on_template_created(current).await?;

        Ok(UpdateReport { removed, applied })
    }

    /// Mirror every declared template into a freshly created namespace.
    ///
    /// A template whose source is missing or whose patterns are invalid is
    /// skipped; the others still apply. Failing to list templates fails the handler,
    /// and so does any access failure once every template has been visited.
    #[instrument(skip(self))]
    pub async fn on_namespace_created(&self, namespace: &str) -> Result<NamespaceReport> {
        let declarations = list_all_declarations(self.api.as_ref()).await?;
        let mut report = NamespaceReport::default();

        info!("Namespace created, checking {} templates", declarations.len());

        for declaration in declarations {
            let identity = declaration.identity.clone();

            let spec = match MirrorSpecification::build(self.api.as_ref(), &declaration).await {
                Ok(spec) => spec,
                Err(e) => {
                    warn!(
                        "Skipping template {} for namespace {}: {}",
                        identity, namespace, e
                    );
                    report.failures.push((identity, e));
                    continue;
                }
            };

            match self.executor.apply_to_namespace(&spec, namespace).await {
                Ok(ApplyOutcome::Applied) => {
                    info!(
                        "Mirrored {} {} into namespace {}",
                        declaration.kind,
                        declaration.source_ref(),
                        namespace
                    );
                    report.applied.push(identity);
                }
                Ok(ApplyOutcome::Skipped) => report.skipped.push(identity),
                Err(MirrorError::Conflict(msg)) => {
                    info!("Template {} already present in {}: {}", identity, namespace, msg);
                    report.conflicts.push(identity);
                }
                Err(e) => {
                    error!(
                        "Failed to mirror template {} into namespace {}: {}",
                        identity, namespace, e
                    );
                    report.failures.push((identity, e));
                }
            }
        }

        let access_failures = report
            .failures
            .iter()
            .filter(|(_, e)| e.is_access_failure())
            .count();
        if access_failures > 0 {
            return Err(MirrorError::Incomplete {
                operation: "namespace mirroring",
                failed: access_failures,
            });
        }

        Ok(report)
    }
}
