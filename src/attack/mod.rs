// SPDX-License-Identifier: PMPL-1.0-or-later

//! Attack orchestration module
//!
//! A file attack goes through the same steps no matter who requests it:
//! defaults are completed according to a [`DefaultsPolicy`], the
//! specification is validated, and only then is it handed to an
//! [`AttackExecutor`].

pub mod executor;
pub mod file;

use crate::error::{AttackError, ValidationError};
use crate::types::*;
use log::debug;
use serde::{Deserialize, Serialize};

pub use executor::{AttackExecutor, JournalExecutor};
pub use file::{FileAction, FileCommand};

/// Which actions get `complete_defaults` before validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultsPolicy {
    /// Only `create` and `delete` are completed. An `append` without a
    /// count therefore validates with `count == 0`.
    #[default]
    Legacy,
    /// Every action is completed.
    Always,
}

impl DefaultsPolicy {
    fn applies_to(&self, action: Option<FileAction>) -> bool {
        match self {
            DefaultsPolicy::Always => true,
            DefaultsPolicy::Legacy => {
                matches!(action, Some(FileAction::Create) | Some(FileAction::Delete))
            }
        }
    }
}

/// Apply the defaults policy, then validate.
pub fn prepare(spec: &mut FileCommand, policy: DefaultsPolicy) -> Result<(), ValidationError> {
    let action = spec.action().ok();
    if policy.applies_to(action) {
        spec.complete_defaults();
    } else {
        debug!(
            "defaults not applied to action {:?} under {:?} policy",
            spec.common.action, policy
        );
    }
    spec.validate()
}

/// Prepare a file attack and hand it to `executor`, returning the attack uid.
pub fn launch(
    spec: &mut FileCommand,
    policy: DefaultsPolicy,
    executor: &dyn AttackExecutor,
    mode: ExecutionMode,
) -> Result<String, AttackError> {
    prepare(spec, policy)?;
    debug!("launching file attack: {}", spec.recover_data());
    executor
        .execute_attack(AttackKind::File, &*spec, mode)
        .map_err(AttackError::Execution)
}
