// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::runtime::finalizer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    Conflict(String),

    #[error("Access denied: {0}")]
    Unauthorized(String),

    #[error("Kubernetes API unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid template declaration: {0}")]
    InvalidDeclaration(String),

    #[error("{operation} incomplete, {failed} namespace(s) failed")]
    Incomplete { operation: &'static str, failed: usize },

    #[error("Finalizer error: {0}")]
    Finalizer(#[source] Box<finalizer::Error<MirrorError>>),
}

impl MirrorError {
    /// Access failures are surfaced to the caller and rely on redelivery.
    pub fn is_access_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Unavailable(_))
    }
}

impl From<kube::Error> for MirrorError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => match resp.code {
                404 => Self::NotFound(resp.message),
                409 => Self::Conflict(resp.message),
                401 | 403 => Self::Unauthorized(resp.message),
                code => Self::Unavailable(format!("{} (HTTP {})", resp.message, code)),
            },
            other => Self::Unavailable(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
