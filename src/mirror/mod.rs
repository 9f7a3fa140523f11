// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The mirroring engine: namespace selection, source snapshots, and the
//! handlers that create and remove mirrored objects.

pub mod executor;
pub mod handlers;
pub mod registry;
pub mod selector;
pub mod snapshot;
pub mod spec;

pub use executor::{ApplyOutcome, ApplyReport, MirrorExecutor, RemoveOutcome, RemoveReport};
pub use handlers::{MirrorHandlers, NamespaceReport, UpdateReport};
pub use registry::{list_all_declarations, list_declarations};
pub use selector::{selects, NamespaceSelector};
pub use snapshot::SourceSnapshot;
pub use spec::MirrorSpecification;
