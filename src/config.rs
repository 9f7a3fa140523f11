// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Delay before a failed template event is delivered again
    pub error_requeue: Duration,
    /// Poll API discovery for the template CRDs before starting
    pub wait_for_crds: bool,
    /// Treat namespaces from the initial listing as newly created
    pub replay_existing_namespaces: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_requeue: Duration::from_secs(60),
            wait_for_crds: true,
            replay_existing_namespaces: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let error_requeue = match lookup("ERROR_REQUEUE_SECONDS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("ERROR_REQUEUE_SECONDS is not a number: {}", v))?,
            ),
            None => defaults.error_requeue,
        };

        let wait_for_crds = parse_bool(&lookup, "WAIT_FOR_CRDS", defaults.wait_for_crds)?;
        let replay_existing_namespaces = parse_bool(
            &lookup,
            "REPLAY_EXISTING_NAMESPACES",
            defaults.replay_existing_namespaces,
        )?;

        Ok(Config {
            error_requeue,
            wait_for_crds,
            replay_existing_namespaces,
        })
    }
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    match lookup(key) {
        Some(v) => v
            .parse()
            .with_context(|| format!("{} must be true or false, got {}", key, v)),
        None => Ok(default),
    }
}
