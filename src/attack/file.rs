// SPDX-License-Identifier: PMPL-1.0-or-later

//! File attack specifications: create, modify, delete, rename, append, replace.

use crate::error::ValidationError;
use crate::types::{AttackConfig, AttackKind, CommonAttackConfig};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six file attack variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileAction {
    Create,
    ModifyPrivilege,
    Delete,
    Rename,
    Append,
    Replace,
}

impl FileAction {
    pub fn all() -> [FileAction; 6] {
        [
            FileAction::Create,
            FileAction::ModifyPrivilege,
            FileAction::Delete,
            FileAction::Rename,
            FileAction::Append,
            FileAction::Replace,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileAction::Create => "create",
            FileAction::ModifyPrivilege => "modify",
            FileAction::Delete => "delete",
            FileAction::Rename => "rename",
            FileAction::Append => "append",
            FileAction::Replace => "replace",
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FileAction {
    type Err = ValidationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        FileAction::all()
            .into_iter()
            .find(|action| action.as_str() == tag)
            .ok_or_else(|| ValidationError::UnsupportedAction(tag.to_string()))
    }
}

/// One file-system fault to inject.
///
/// Only the fields of the active action are meaningful; the rest stay at
/// their zero value and are left out of the recovery record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommand {
    #[serde(flatten)]
    pub common: CommonAttackConfig,

    /// File to create, modify, delete, append to, or rewrite
    #[serde(rename = "file-name", default, skip_serializing_if = "String::is_empty")]
    pub file_name: String,
    /// Directory to create or delete
    #[serde(rename = "dir-name", default, skip_serializing_if = "String::is_empty")]
    pub dir_name: String,
    /// Permission bits to apply
    #[serde(default, skip_serializing_if = "is_zero")]
    pub privilege: u32,
    #[serde(rename = "source-file", default, skip_serializing_if = "String::is_empty")]
    pub source_file: String,
    #[serde(rename = "dest-file", default, skip_serializing_if = "String::is_empty")]
    pub dest_file: String,
    /// Payload to append
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    /// How many times the payload is appended
    #[serde(default, skip_serializing_if = "is_zero")]
    pub count: i64,
    /// Permission bits seen before the attack; filled in by the executor.
    #[serde(rename = "origin-privilege", default, skip_serializing_if = "is_zero")]
    pub origin_privilege: i64,
    #[serde(rename = "origin-string", default, skip_serializing_if = "String::is_empty")]
    pub origin_str: String,
    #[serde(rename = "dest-string", default, skip_serializing_if = "String::is_empty")]
    pub dest_str: String,
    /// Line to rewrite; 0 rewrites every line.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: i64,
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl FileCommand {
    pub fn new() -> Self {
        Self {
            common: CommonAttackConfig::new(AttackKind::File),
            ..Self::default()
        }
    }

    /// Build an empty file attack tagged with `action`.
    pub fn with_action(action: FileAction) -> Self {
        let mut command = Self::new();
        command.set_action(action);
        command
    }

    pub fn set_action(&mut self, action: FileAction) {
        self.common.action = action.as_str().to_string();
    }

    /// Parse the raw action tag.
    pub fn action(&self) -> Result<FileAction, ValidationError> {
        self.common.action.parse()
    }

    /// Rebuild a specification from a string produced by [`AttackConfig::recover_data`].
    pub fn from_recover_data(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    fn valid_file_create(&self) -> Result<(), ValidationError> {
        if self.file_name.is_empty() && self.dir_name.is_empty() {
            return Err(ValidationError::FileOrDirRequired);
        }
        Ok(())
    }

    fn valid_file_modify(&self) -> Result<(), ValidationError> {
        if self.file_name.is_empty() {
            return Err(ValidationError::ModifyFileRequired);
        }
        if self.privilege == 0 {
            return Err(ValidationError::PrivilegeRequired);
        }
        Ok(())
    }

    fn valid_file_delete(&self) -> Result<(), ValidationError> {
        if self.file_name.is_empty() && self.dir_name.is_empty() {
            return Err(ValidationError::FileOrDirRequired);
        }
        Ok(())
    }

    fn valid_file_rename(&self) -> Result<(), ValidationError> {
        if self.source_file.is_empty() || self.dest_file.is_empty() {
            return Err(ValidationError::RenamePathsRequired);
        }
        Ok(())
    }

    fn valid_file_append(&self) -> Result<(), ValidationError> {
        if self.file_name.is_empty() {
            return Err(ValidationError::FileNameRequired);
        }
        if self.data.is_empty() {
            return Err(ValidationError::AppendDataRequired);
        }
        Ok(())
    }

    fn valid_file_replace(&self) -> Result<(), ValidationError> {
        if self.file_name.is_empty() {
            return Err(ValidationError::FileNameRequired);
        }
        if self.origin_str.is_empty() || self.dest_str.is_empty() {
            return Err(ValidationError::ReplaceStringsRequired);
        }
        Ok(())
    }

    fn set_default_for_file_append(&mut self) {
        if self.count == 0 {
            debug!("append count unset, defaulting to 1");
            self.count = 1;
        }
    }
}

impl AttackConfig for FileCommand {
    fn validate(&self) -> Result<(), ValidationError> {
        self.common.validate()?;

        match self.action()? {
            FileAction::Create => self.valid_file_create(),
            FileAction::ModifyPrivilege => self.valid_file_modify(),
            FileAction::Delete => self.valid_file_delete(),
            FileAction::Rename => self.valid_file_rename(),
            FileAction::Append => self.valid_file_append(),
            FileAction::Replace => self.valid_file_replace(),
        }
    }

    fn complete_defaults(&mut self) {
        // Unknown tags have no defaults; validation reports them.
        if let Ok(FileAction::Append) = self.action() {
            self.set_default_for_file_append();
        }
    }

    fn recover_data(&self) -> String {
        // Plain strings and integers only, so serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    fn common(&self) -> &CommonAttackConfig {
        &self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(action: FileAction) -> FileCommand {
        FileCommand::with_action(action)
    }

    #[test]
    fn test_new_command_is_file_kind_without_action() {
        let command = FileCommand::new();
        assert_eq!(command.common.kind, "file");
        assert!(command.common.action.is_empty());
        assert_eq!(
            command.validate(),
            Err(ValidationError::UnsupportedAction(String::new()))
        );
    }

    #[test]
    fn test_action_tags_parse() {
        for action in FileAction::all() {
            assert_eq!(action.as_str().parse::<FileAction>(), Ok(action));
        }
        assert_eq!(
            "truncate".parse::<FileAction>(),
            Err(ValidationError::UnsupportedAction("truncate".to_string()))
        );
    }

    #[test]
    fn test_base_validation_runs_first() {
        let mut command = spec(FileAction::Create);
        command.common.kind.clear();
        assert_eq!(command.validate(), Err(ValidationError::KindMissing));
    }

    #[test]
    fn test_create_and_delete_need_file_or_dir() {
        for action in [FileAction::Create, FileAction::Delete] {
            let mut command = spec(action);
            assert_eq!(command.validate(), Err(ValidationError::FileOrDirRequired));
            assert_eq!(
                command.validate().unwrap_err().to_string(),
                "one of file-name and dir-name is required"
            );

            command.dir_name = "/tmp/chaos".to_string();
            assert!(command.validate().is_ok());

            command.dir_name.clear();
            command.file_name = "a.txt".to_string();
            assert!(command.validate().is_ok());
        }
    }

    #[test]
    fn test_modify_checks_file_then_privilege() {
        let mut command = spec(FileAction::ModifyPrivilege);
        command.privilege = 0o644;
        assert_eq!(command.validate(), Err(ValidationError::ModifyFileRequired));

        command.file_name = "a.txt".to_string();
        command.privilege = 0;
        assert_eq!(
            command.validate().unwrap_err().to_string(),
            "file privilege is required"
        );

        command.privilege = 0o777;
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_rename_needs_both_paths() {
        let mut command = spec(FileAction::Rename);
        command.source_file = "a".to_string();
        assert_eq!(
            command.validate().unwrap_err().to_string(),
            "both source file and destination file are required"
        );

        command.source_file.clear();
        command.dest_file = "b".to_string();
        assert_eq!(command.validate(), Err(ValidationError::RenamePathsRequired));

        command.source_file = "a".to_string();
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_append_checks_file_then_data() {
        let mut command = spec(FileAction::Append);
        command.data = "x".to_string();
        assert_eq!(
            command.validate().unwrap_err().to_string(),
            "file-name is required"
        );

        command.file_name = "a.txt".to_string();
        command.data.clear();
        assert_eq!(
            command.validate().unwrap_err().to_string(),
            "append data is required"
        );

        command.data = "x".to_string();
        assert_eq!(command.count, 0);
        assert!(command.validate().is_ok(), "count is not validated");
    }

    #[test]
    fn test_replace_checks_file_then_strings() {
        let mut command = spec(FileAction::Replace);
        command.origin_str = "foo".to_string();
        command.dest_str = "bar".to_string();
        assert_eq!(command.validate(), Err(ValidationError::FileNameRequired));

        command.file_name = "a.txt".to_string();
        command.dest_str.clear();
        assert_eq!(
            command.validate().unwrap_err().to_string(),
            "both origin and destination string are required"
        );

        command.dest_str = "bar".to_string();
        assert_eq!(command.line, 0);
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let mut command = FileCommand::new();
        command.common.action = "chmod".to_string();
        command.file_name = "a.txt".to_string();
        assert_eq!(
            command.validate().unwrap_err().to_string(),
            "file action chmod not supported"
        );
    }

    #[test]
    fn test_validation_ignores_unrelated_fields() {
        let mut command = spec(FileAction::Rename);
        command.source_file = "a".to_string();
        command.dest_file = "b".to_string();
        command.data = "ignored".to_string();
        command.privilege = 0o600;
        let before = command.clone();
        assert!(command.validate().is_ok());
        assert_eq!(command, before);
    }

    #[test]
    fn test_append_defaults_count() {
        let mut command = spec(FileAction::Append);
        command.complete_defaults();
        assert_eq!(command.count, 1);

        command.count = 5;
        command.complete_defaults();
        assert_eq!(command.count, 5);
    }

    #[test]
    fn test_complete_defaults_is_idempotent() {
        let mut once = spec(FileAction::Append);
        once.complete_defaults();
        let mut twice = once.clone();
        twice.complete_defaults();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_other_actions_have_no_defaults() {
        for action in FileAction::all()
            .into_iter()
            .filter(|a| *a != FileAction::Append)
        {
            let mut command = spec(action);
            let before = command.clone();
            command.complete_defaults();
            assert_eq!(command, before, "{} should be unchanged", action);
        }

        let mut unknown = FileCommand::new();
        unknown.common.action = "bogus".to_string();
        let before = unknown.clone();
        unknown.complete_defaults();
        assert_eq!(unknown, before);
    }

    #[test]
    fn test_recover_data_key_order_and_omission() {
        let mut command = spec(FileAction::Append);
        command.file_name = "a.txt".to_string();
        command.data = "x".to_string();
        command.count = 3;
        assert_eq!(
            command.recover_data(),
            r#"{"action":"append","kind":"file","file-name":"a.txt","data":"x","count":3}"#
        );
    }

    #[test]
    fn test_recover_data_keeps_origin_privilege() {
        let mut command = spec(FileAction::ModifyPrivilege);
        command.file_name = "a.txt".to_string();
        command.privilege = 0o777;
        command.origin_privilege = 0o644;
        let data = command.recover_data();
        assert!(data.contains(r#""privilege":511"#));
        assert!(data.contains(r#""origin-privilege":420"#));
        assert_eq!(FileCommand::from_recover_data(&data).unwrap(), command);
    }

    #[test]
    fn test_from_recover_data_tolerates_missing_keys() {
        let command = FileCommand::from_recover_data("{}").unwrap();
        assert_eq!(command, FileCommand::default());

        let command =
            FileCommand::from_recover_data(r#"{"kind":"file","action":"delete","dir-name":"d"}"#)
                .unwrap();
        assert_eq!(command.action(), Ok(FileAction::Delete));
        assert_eq!(command.dir_name, "d");
    }
}
