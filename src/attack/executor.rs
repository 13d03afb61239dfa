// SPDX-License-Identifier: PMPL-1.0-or-later

//! Attack execution contract and the journaling executor

use crate::storage::{self, AttackRecord};
use crate::types::*;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Something that can carry out a validated attack and hand back its uid.
pub trait AttackExecutor {
    fn execute_attack(
        &self,
        kind: AttackKind,
        spec: &dyn AttackConfig,
        mode: ExecutionMode,
    ) -> Result<String>;
}

/// Records each attack in the recovery journal without touching the
/// target files.
pub struct JournalExecutor {
    journal_dir: PathBuf,
}

impl JournalExecutor {
    pub fn new(journal_dir: impl Into<PathBuf>) -> Self {
        Self {
            journal_dir: journal_dir.into(),
        }
    }

    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }
}

impl AttackExecutor for JournalExecutor {
    fn execute_attack(
        &self,
        kind: AttackKind,
        spec: &dyn AttackConfig,
        mode: ExecutionMode,
    ) -> Result<String> {
        let uid = match spec.common().uid.as_str() {
            "" => generate_uid()?,
            uid => uid.to_string(),
        };

        let record = AttackRecord {
            uid: uid.clone(),
            kind,
            mode,
            created_at: chrono::Utc::now().to_rfc3339(),
            recover_data: spec.recover_data(),
        };
        storage::persist_record(&record, &self.journal_dir)?;

        Ok(uid)
    }
}

/// 16 random bytes, hex encoded.
pub fn generate_uid() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|err| anyhow!("generating attack uid: {}", err))?;
    Ok(hex::encode(bytes))
}
