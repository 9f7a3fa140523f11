// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Template reconciler - turns ClusterConfigMap/ClusterSecret changes into
//! created, updated and deleted events for the mirror handlers.

use crate::constants::{annotations, FINALIZER};
use crate::error::{MirrorError, Result};
use crate::mirror::MirrorHandlers;
use crate::types::{TemplateDeclaration, TemplateResource};
use futures::StreamExt;
use kube::{
    api::{Patch, PatchParams},
    runtime::{
        controller::Action,
        finalizer::{finalizer, Event as Finalizer},
        Controller,
    },
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct TemplateReconciler<K> {
    client: Client,
    handlers: MirrorHandlers,
    error_requeue: Duration,
    _kind: PhantomData<fn() -> K>,
}

impl<K: TemplateResource> TemplateReconciler<K> {
    pub fn new(client: Client, handlers: MirrorHandlers, error_requeue: Duration) -> Self {
        Self {
            client,
            handlers,
            error_requeue,
            _kind: PhantomData,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let templates: Api<K> = Api::all(self.client.clone());
        let context = Arc::new(self);

        info!("Watching {} templates", K::KIND);

        Controller::new(templates, WatcherConfig::default())
            .run(reconcile::<K>, error_policy::<K>, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled template: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }

    async fn apply(&self, api: &Api<K>, template: &K) -> Result<Action> {
        let current = template.declaration();

        match classify(last_applied(template), &current) {
            TemplateChange::Created => {
                self.handlers.on_template_created(&current).await?;
            }
            TemplateChange::Updated(previous) => {
                self.handlers.on_template_updated(&previous, &current).await?;
            }
            TemplateChange::Unchanged => {
                debug!("Template {} unchanged", current.identity);
                return Ok(Action::await_change());
            }
        }

        record_last_applied(api, template, &current).await?;
        Ok(Action::await_change())
    }

    async fn cleanup(&self, template: &K) -> Result<Action> {
        let declaration = last_applied(template).unwrap_or_else(|| template.declaration());
        self.handlers.on_template_deleted(&declaration).await?;
        Ok(Action::await_change())
    }
}

async fn reconcile<K: TemplateResource>(
    template: Arc<K>,
    ctx: Arc<TemplateReconciler<K>>,
) -> Result<Action> {
    let api: Api<K> = Api::all(ctx.client.clone());

    debug!("Reconciling {} template: {}", K::KIND, template.name_any());

    finalizer(&api, FINALIZER, template, |event| async {
        match event {
            Finalizer::Apply(t) => ctx.apply(&api, &t).await,
            Finalizer::Cleanup(t) => ctx.cleanup(&t).await,
        }
    })
    .await
    .map_err(|e| MirrorError::Finalizer(Box::new(e)))
}

fn error_policy<K: TemplateResource>(
    template: Arc<K>,
    error: &MirrorError,
    ctx: Arc<TemplateReconciler<K>>,
) -> Action {
    error!(
        "Reconciliation error for template {}: {}",
        template.name_any(),
        error
    );
    Action::requeue(ctx.error_requeue)
}

#[derive(Debug, PartialEq)]
enum TemplateChange {
    Created,
    Updated(TemplateDeclaration),
    Unchanged,
}

fn classify(previous: Option<TemplateDeclaration>, current: &TemplateDeclaration) -> TemplateChange {
    match previous {
        None => TemplateChange::Created,
        Some(previous) if previous == *current => TemplateChange::Unchanged,
        Some(previous) => TemplateChange::Updated(previous),
    }
}

/// The declaration stored when the template was last mirrored
fn last_applied<K: TemplateResource>(template: &K) -> Option<TemplateDeclaration> {
    let raw = template.annotations().get(annotations::LAST_APPLIED)?;
    match serde_json::from_str(raw) {
        Ok(declaration) => Some(declaration),
        Err(e) => {
            warn!(
                "Ignoring unreadable {} annotation on {}: {}",
                annotations::LAST_APPLIED,
                template.name_any(),
                e
            );
            None
        }
    }
}

async fn record_last_applied<K: TemplateResource>(
    api: &Api<K>,
    template: &K,
    declaration: &TemplateDeclaration,
) -> Result<()> {
    let value = serde_json::to_string(declaration)
        .map_err(|e| MirrorError::InvalidDeclaration(e.to_string()))?;

    let mut annotation = serde_json::Map::new();
    annotation.insert(
        annotations::LAST_APPLIED.to_string(),
        serde_json::Value::String(value),
    );
    let patch = serde_json::json!({ "metadata": { "annotations": annotation } });

    api.patch(
        &template.name_any(),
        &PatchParams::default(),
        &Patch::Merge(&patch),
    )
    .await?;
    Ok(())
}
