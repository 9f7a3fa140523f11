// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cluster_mirror::config::Config;
use cluster_mirror::kubernetes::{wait_for_template_crds, KubeClusterApi};
use cluster_mirror::mirror::MirrorHandlers;
use cluster_mirror::reconcilers::{NamespaceReconciler, TemplateReconciler};
use cluster_mirror::types::{ClusterConfigMap, ClusterSecret};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting cluster-mirror operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: error_requeue={:?}, wait_for_crds={}, replay_existing_namespaces={}",
        config.error_requeue, config.wait_for_crds, config.replay_existing_namespaces
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    if config.wait_for_crds {
        info!("Waiting for template CRDs to become available...");
        wait_for_template_crds(&client).await?;
    }

    let handlers = MirrorHandlers::new(Arc::new(KubeClusterApi::new(client.clone())));

    let config_maps = TemplateReconciler::<ClusterConfigMap>::new(
        client.clone(),
        handlers.clone(),
        config.error_requeue,
    );
    let secrets = TemplateReconciler::<ClusterSecret>::new(
        client.clone(),
        handlers.clone(),
        config.error_requeue,
    );
    let namespaces =
        NamespaceReconciler::new(client, handlers, config.replay_existing_namespaces);

    info!("Starting reconcilers...");

    tokio::try_join!(config_maps.run(), secrets.run(), namespaces.run())?;

    // This should never be reached as reconcilers run forever
    warn!("All reconcilers stopped unexpectedly");
    Ok(())
}
