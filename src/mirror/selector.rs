// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Include/exclude namespace selection.
//!
//! Patterns are regular expressions anchored at the start of the namespace
//! name only: `team` selects `team-a`, `-a` does not. When both lists are
//! configured the include list alone decides and the exclude list is ignored.

use crate::error::{MirrorError, Result};
use regex::Regex;

/// Compiled include/exclude pattern lists of one template declaration
#[derive(Debug, Clone)]
pub struct NamespaceSelector {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl NamespaceSelector {
    /// Compile both pattern lists, failing on the first unparsable pattern
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
        })
    }

    /// Decide whether a mirror belongs in `namespace`
    pub fn selects(&self, namespace: &str) -> bool {
        if self.include.is_empty() && self.exclude.is_empty() {
            return true;
        }

        let mut verdict = true;
        if !self.exclude.is_empty() {
            verdict = !self.exclude.iter().any(|p| p.is_match(namespace));
        }

        // Include rules replace the exclude verdict entirely.
        if !self.include.is_empty() {
            verdict = self.include.iter().any(|p| p.is_match(namespace));
        }

        verdict
    }
}

/// One-shot selection over raw pattern lists
pub fn selects(include: &[String], exclude: &[String], namespace: &str) -> Result<bool> {
    Ok(NamespaceSelector::new(include, exclude)?.selects(namespace))
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns.iter().map(|p| compile_prefix(p)).collect()
}

fn compile_prefix(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
        MirrorError::InvalidDeclaration(format!("invalid namespace pattern '{}': {}", pattern, e))
    })
}
