// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Validated mirror specifications: a declaration, its compiled selector and a source snapshot.

use crate::error::{MirrorError, Result};
use crate::kubernetes::ClusterApi;
use crate::mirror::selector::NamespaceSelector;
use crate::mirror::snapshot::SourceSnapshot;
use crate::types::TemplateDeclaration;

/// A validated template declaration together with a fresh snapshot of its source
#[derive(Debug, Clone)]
pub struct MirrorSpecification {
    declaration: TemplateDeclaration,
    selector: NamespaceSelector,
    snapshot: SourceSnapshot,
}

impl MirrorSpecification {
    /// Validate `declaration` against `snapshot`
    pub fn new(declaration: TemplateDeclaration, snapshot: SourceSnapshot) -> Result<Self> {
        if snapshot.kind() != declaration.kind {
            return Err(MirrorError::InvalidDeclaration(format!(
                "template {} declares a {} but its source is a {}",
                declaration.identity,
                declaration.kind,
                snapshot.kind()
            )));
        }
        let selector =
            NamespaceSelector::new(&declaration.include_patterns, &declaration.exclude_patterns)?;

        Ok(Self {
            declaration,
            selector,
            snapshot,
        })
    }

    /// Validate the patterns first, then fetch the source snapshot
    pub async fn build(api: &dyn ClusterApi, declaration: &TemplateDeclaration) -> Result<Self> {
        NamespaceSelector::new(&declaration.include_patterns, &declaration.exclude_patterns)?;
        let snapshot = SourceSnapshot::fetch(
            api,
            declaration.kind,
            &declaration.source_name,
            &declaration.source_namespace,
        )
        .await?;
        Self::new(declaration.clone(), snapshot)
    }

    pub fn declaration(&self) -> &TemplateDeclaration {
        &self.declaration
    }

    pub fn snapshot(&self) -> &SourceSnapshot {
        &self.snapshot
    }

    pub fn selects(&self, namespace: &str) -> bool {
        self.selector.selects(namespace)
    }
}
