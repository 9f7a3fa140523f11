// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access: the cluster API capability set and CRD discovery.

pub mod api;
pub mod crd;

pub use api::{ClusterApi, KubeClusterApi};
pub use crd::wait_for_template_crds;
