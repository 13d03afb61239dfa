// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for file-chaos
//!
//! Every attack specification embeds a [`CommonAttackConfig`] and exposes
//! the [`AttackConfig`] capabilities the driver and executors rely on.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of attack this tool knows how to describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    File,
}

impl AttackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackKind::File => "file",
        }
    }
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How an attack was requested. Does not affect validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One-shot invocation from the command line
    Command,
    /// Driven by a long-running managed process
    Server,
}

/// Action-independent fields shared by every attack specification.
///
/// `action` is kept as the raw tag so a recovery record reproduces exactly
/// what was requested, including tags this build does not understand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonAttackConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
}

impl CommonAttackConfig {
    pub fn new(kind: AttackKind) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind.is_empty() {
            return Err(ValidationError::KindMissing);
        }
        // Empty means the executor picks one.
        if !self.uid.is_empty() {
            check_uid(&self.uid)?;
        }
        Ok(())
    }
}

/// A uid names a journal file, so it must stay a single path component.
pub fn check_uid(uid: &str) -> Result<(), ValidationError> {
    let escapes = uid.trim().is_empty()
        || uid.contains(['/', '\\', '\0'])
        || uid.contains("..");
    if escapes {
        return Err(ValidationError::InvalidUid(uid.to_string()));
    }
    Ok(())
}

/// Capabilities every attack specification provides to the driver.
pub trait AttackConfig {
    /// Check the required fields of the active action. Never mutates.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Fill in action-specific defaults. Idempotent.
    fn complete_defaults(&mut self);

    /// Snapshot of every field, used later to reverse the attack.
    fn recover_data(&self) -> String;

    fn common(&self) -> &CommonAttackConfig;
}
