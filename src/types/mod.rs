// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Template custom resources and the declarations derived from them.

pub mod payload;
pub mod template;

pub use payload::MirrorPayload;
pub use template::{
    ClusterConfigMap, ClusterConfigMapSpec, ClusterSecret, ClusterSecretSpec, ResourceKind,
    TemplateDeclaration, TemplateResource,
};
