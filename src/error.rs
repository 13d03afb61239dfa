// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types shared by the attack specifications and the CLI.

use thiserror::Error;

/// Exit code for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for execution and I/O failures.
pub const EXIT_ERROR: i32 = 1;
/// Exit code for malformed or incomplete attack specifications.
pub const EXIT_BAD_ARGS: i32 = 2;

/// First violated rule of an attack specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("attack kind not provided")]
    KindMissing,

    #[error("one of file-name and dir-name is required")]
    FileOrDirRequired,

    #[error("file name is required")]
    ModifyFileRequired,

    #[error("file privilege is required")]
    PrivilegeRequired,

    #[error("both source file and destination file are required")]
    RenamePathsRequired,

    #[error("file-name is required")]
    FileNameRequired,

    #[error("append data is required")]
    AppendDataRequired,

    #[error("both origin and destination string are required")]
    ReplaceStringsRequired,

    #[error("invalid attack uid {0:?}: must be a plain file name")]
    InvalidUid(String),

    #[error("file action {0} not supported")]
    UnsupportedAction(String),
}

#[derive(Debug, Error)]
pub enum AttackError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failure reported by the executor, passed through untouched.
    #[error(transparent)]
    Execution(anyhow::Error),
}

impl AttackError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AttackError::Validation(_) => EXIT_BAD_ARGS,
            AttackError::Execution(_) => EXIT_ERROR,
        }
    }
}
