// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::constants::{GROUP, VERSION};
use crate::error::Result;
use crate::types::{ClusterConfigMap, ClusterSecret};
use kube::{discovery::Discovery, Client, Resource};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

fn template_kinds() -> [String; 2] {
    [ClusterConfigMap::kind(&()).to_string(), ClusterSecret::kind(&()).to_string()]
}

/// Wait for both template CRDs to become available in the cluster.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_template_crds(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match missing_template_kinds(client).await {
            Ok(missing) if missing.is_empty() => {
                info!("Template CRDs ({}/{}) are available", GROUP, VERSION);
                return Ok(());
            }
            Ok(missing) => {
                info!(
                    "Template CRDs {:?} ({}/{}) not yet available, waiting {} seconds...",
                    missing, GROUP, VERSION, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for template CRDs: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

/// Discover the template API group and report which kinds are still missing.
async fn missing_template_kinds(client: &Client) -> Result<Vec<String>> {
    let discovery = Discovery::new(client.clone())
        .filter(&[GROUP])
        .run()
        .await?;

    let mut served = Vec::new();
    for group in discovery.groups() {
        if group.name() == GROUP {
            for (ar, _) in group.versioned_resources(VERSION) {
                served.push(ar.kind);
            }
        }
    }

    Ok(missing_kinds(&served))
}

fn missing_kinds(served: &[String]) -> Vec<String> {
    template_kinds()
        .into_iter()
        .filter(|kind| !served.contains(kind))
        .collect()
}
