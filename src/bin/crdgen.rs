// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prints the template CRDs as a YAML stream, e.g. `cargo run --bin crdgen | kubectl apply -f -`

use cluster_mirror::types::{ClusterConfigMap, ClusterSecret};
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    for crd in [ClusterConfigMap::crd(), ClusterSecret::crd()] {
        print!("---\n{}", serde_yaml::to_string(&crd)?);
    }
    Ok(())
}
