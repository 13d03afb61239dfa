// SPDX-License-Identifier: PMPL-1.0-or-later

//! Recovery journal: one JSON record per launched attack

use crate::types::{check_uid, AttackKind, ExecutionMode};
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// What a later undo needs to know about one attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub uid: String,
    pub kind: AttackKind,
    pub mode: ExecutionMode,
    pub created_at: String,
    /// Output of `AttackConfig::recover_data`, stored verbatim
    pub recover_data: String,
}

pub fn record_path(dir: &Path, uid: &str) -> PathBuf {
    dir.join(format!("{}.json", uid))
}

pub fn persist_record(record: &AttackRecord, dir: &Path) -> Result<PathBuf> {
    check_uid(&record.uid)?;
    fs::create_dir_all(dir)
        .with_context(|| format!("creating journal directory {}", dir.display()))?;
    let path = record_path(dir, &record.uid);
    let payload = serde_json::to_string_pretty(record)?;

    // create_new keeps a concurrent launch with the same uid from overwriting.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(anyhow!(
                "attack {} is already journaled at {}",
                record.uid,
                path.display()
            ));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("creating {}", path.display()));
        }
    };
    file.write_all(payload.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    info!("journaled {} attack {} at {}", record.kind, record.uid, path.display());
    Ok(path)
}

pub fn load_record(dir: &Path, uid: &str) -> Result<AttackRecord> {
    check_uid(uid)?;
    let path = record_path(dir, uid);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading attack record {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing attack record {}", path.display()))
}

pub fn list_records(dir: &Path) -> Result<Vec<AttackRecord>> {
    if !dir.exists() {
        return Err(anyhow!("journal directory not found: {}", dir.display()));
    }

    let mut records: Vec<AttackRecord> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .filter_map(|path| match read_record(&path) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("skipping journal entry {}: {:#}", path.display(), err);
                None
            }
        })
        .collect();

    records.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.uid.cmp(&b.uid))
    });
    Ok(records)
}

fn read_record(path: &Path) -> Result<AttackRecord> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
