// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes reconcilers that react to watch events.

pub mod namespace;
pub mod template;

pub use namespace::{NamespaceReconciler, NamespaceTracker};
pub use template::TemplateReconciler;
