// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Discovery of the template declarations currently present in the cluster.

use crate::error::Result;
use crate::kubernetes::ClusterApi;
use crate::types::{ResourceKind, TemplateDeclaration};
use tracing::{debug, instrument, warn};

/// List every declaration of `kind`, skipping ones without source coordinates.
///
/// Nothing is cached; each call lists the custom resources again.
#[instrument(skip(api))]
pub async fn list_declarations(
    api: &dyn ClusterApi,
    kind: ResourceKind,
) -> Result<Vec<TemplateDeclaration>> {
    let declarations = api.list_templates(kind).await?;
    let total = declarations.len();

    let usable: Vec<_> = declarations
        .into_iter()
        .filter(|decl| {
            let complete = !decl.source_name.is_empty() && !decl.source_namespace.is_empty();
            if !complete {
                warn!(
                    "Template {} has no source name or namespace, ignoring it",
                    decl.identity
                );
            }
            complete
        })
        .collect();

    debug!("Found {} {} templates ({} usable)", total, kind, usable.len());
    Ok(usable)
}

/// List declarations of both kinds, ConfigMaps first
pub async fn list_all_declarations(api: &dyn ClusterApi) -> Result<Vec<TemplateDeclaration>> {
    let mut all = Vec::new();
    for kind in ResourceKind::ALL {
        all.extend(list_declarations(api, kind).await?);
    }
    Ok(all)
}
