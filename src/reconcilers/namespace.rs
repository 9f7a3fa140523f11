// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace watcher - detects newly created namespaces and mirrors all templates into them.

use crate::constants::namespace_retry::{ATTEMPTS, INITIAL_DELAY_SECS, MAX_DELAY_SECS};
use crate::mirror::MirrorHandlers;
use futures::StreamExt;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    runtime::{watcher, WatchStreamExt},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

pub struct NamespaceReconciler {
    client: Client,
    handlers: MirrorHandlers,
    replay_existing: bool,
}

impl NamespaceReconciler {
    pub fn new(client: Client, handlers: MirrorHandlers, replay_existing: bool) -> Self {
        Self {
            client,
            handlers,
            replay_existing,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let mut tracker = NamespaceTracker::new(self.replay_existing);
        let mut events = watcher(namespaces, WatcherConfig::default())
            .default_backoff()
            .boxed();

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    for namespace in tracker.observe(event) {
                        self.handle_created(&namespace).await;
                    }
                }
                Err(e) => warn!("Namespace watcher error: {}", e),
            }
        }

        warn!("Namespace watcher stream ended");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn handle_created(&self, namespace: &str) {
        let mut delay = INITIAL_DELAY_SECS;

        for attempt in 1..=ATTEMPTS {
            match self.handlers.on_namespace_created(namespace).await {
                Ok(report) => {
                    info!(
                        "Namespace {} handled: {} mirrored, {} skipped, {} already present, {} failed",
                        namespace,
                        report.applied.len(),
                        report.skipped.len(),
                        report.conflicts.len(),
                        report.failures.len()
                    );
                    return;
                }
                Err(e) if attempt < ATTEMPTS => {
                    warn!(
                        "Failed to handle namespace {} (attempt {}/{}): {}, retrying in {} seconds...",
                        namespace, attempt, ATTEMPTS, e, delay
                    );
                    sleep(Duration::from_secs(delay)).await;
                    delay = (delay * 2).min(MAX_DELAY_SECS);
                }
                Err(e) => {
                    error!(
                        "Giving up on namespace {} after {} attempts: {}",
                        namespace, ATTEMPTS, e
                    );
                }
            }
        }
    }
}

/// Turns a namespace watch stream into "namespace created" notifications.
///
/// Namespaces from the initial listing are considered existing unless
/// `replay_initial` is set. After a relist, namespaces that appeared while the
/// watch was down are reported as created.
#[derive(Debug, Default)]
pub struct NamespaceTracker {
    known: HashSet<String>,
    listing: Option<HashSet<String>>,
    synced: bool,
    replay_initial: bool,
}

impl NamespaceTracker {
    pub fn new(replay_initial: bool) -> Self {
        Self {
            replay_initial,
            ..Default::default()
        }
    }

    /// Feed one watch event, returning the namespaces to treat as created (sorted)
    pub fn observe(&mut self, event: watcher::Event<Namespace>) -> Vec<String> {
        match event {
            watcher::Event::Init => {
                self.listing = Some(HashSet::new());
                Vec::new()
            }
            watcher::Event::InitApply(ns) => {
                if let Some(listing) = self.listing.as_mut() {
                    listing.insert(ns.name_any());
                }
                Vec::new()
            }
            watcher::Event::InitDone => {
                let listing = self.listing.take().unwrap_or_default();
                let mut created: Vec<String> = if self.synced || self.replay_initial {
                    listing.difference(&self.known).cloned().collect()
                } else {
                    Vec::new()
                };
                created.sort();
                debug!("Namespace listing complete: {} namespaces", listing.len());
                self.known = listing;
                self.synced = true;
                created
            }
            watcher::Event::Apply(ns) => {
                let name = ns.name_any();
                if is_terminating(&ns) || !self.known.insert(name.clone()) {
                    return Vec::new();
                }
                vec![name]
            }
            watcher::Event::Delete(ns) => {
                self.known.remove(&ns.name_any());
                Vec::new()
            }
        }
    }
}

fn is_terminating(ns: &Namespace) -> bool {
    ns.status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .is_some_and(|phase| phase == "Terminating")
}
