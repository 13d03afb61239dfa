// SPDX-License-Identifier: PMPL-1.0-or-later

//! file-chaos: inject file-system faults and journal how to undo them

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use file_chaos::attack::{self, DefaultsPolicy, FileAction, FileCommand, JournalExecutor};
use file_chaos::config::Settings;
use file_chaos::error::{EXIT_BAD_ARGS, EXIT_ERROR, EXIT_SUCCESS};
use file_chaos::storage;
use file_chaos::types::{check_uid, ExecutionMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "file-chaos")]
#[command(version)]
#[command(about = "File attack related commands")]
#[command(long_about = None)]
struct Cli {
    /// Settings file (.json, .yaml or .yml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding recovery records
    #[arg(long, value_name = "DIR")]
    journal: Option<PathBuf>,

    /// Use this uid instead of generating one
    #[arg(long)]
    uid: Option<String>,

    /// Complete defaults for every action before validation
    #[arg(long)]
    always_defaults: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create file
    Create(TargetArgs),

    /// Modify file privilege
    Modify {
        /// File to change privilege of
        #[arg(short = 'f', long, default_value_t)]
        file_name: String,

        /// Privilege to apply (decimal, 0/0o octal, 0x hex or 0b binary; `_` separators allowed)
        #[arg(short = 'p', long, default_value_t, value_parser = parse_privilege)]
        privilege: u32,
    },

    /// Delete file
    Delete(TargetArgs),

    /// Rename file
    Rename {
        /// The source file/dir of rename
        #[arg(short = 's', long, default_value_t)]
        source_file: String,

        /// The destination file/dir of rename
        #[arg(short = 'd', long, default_value_t)]
        dest_file: String,
    },

    /// Append file
    Append {
        /// Append data to the file
        #[arg(short = 'f', long, default_value_t)]
        file_name: String,

        /// Append data
        #[arg(short = 'd', long, default_value_t)]
        data: String,

        /// Append count
        #[arg(short = 'c', long, default_value = "1")]
        count: i64,
    },

    /// Replace data in file
    Replace {
        /// Replace data in the file
        #[arg(short = 'f', long, default_value_t)]
        file_name: String,

        /// The origin string to be replaced
        #[arg(short = 'o', long, default_value_t)]
        origin_string: String,

        /// The destination string to replace the origin string
        #[arg(short = 'd', long, default_value_t)]
        dest_string: String,

        /// The line number to replace; 0 replaces all lines
        #[arg(short = 'l', long, default_value = "0")]
        line: i64,
    },

    /// List journaled attacks
    List,

    /// Show the specification journaled for an attack
    Show {
        #[arg(value_name = "UID")]
        uid: String,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// The file to act on
    #[arg(short = 'f', long, default_value_t)]
    file_name: String,

    /// The directory to act on
    #[arg(short = 'd', long, default_value_t)]
    dir_name: String,
}

impl Commands {
    /// Turn an attack subcommand into a specification; `None` for the
    /// journal commands.
    fn into_spec(self) -> Option<FileCommand> {
        let spec = match self {
            Commands::Create(target) => target.into_spec(FileAction::Create),
            Commands::Delete(target) => target.into_spec(FileAction::Delete),
            Commands::Modify {
                file_name,
                privilege,
            } => FileCommand {
                file_name,
                privilege,
                ..FileCommand::with_action(FileAction::ModifyPrivilege)
            },
            Commands::Rename {
                source_file,
                dest_file,
            } => FileCommand {
                source_file,
                dest_file,
                ..FileCommand::with_action(FileAction::Rename)
            },
            Commands::Append {
                file_name,
                data,
                count,
            } => FileCommand {
                file_name,
                data,
                count,
                ..FileCommand::with_action(FileAction::Append)
            },
            Commands::Replace {
                file_name,
                origin_string,
                dest_string,
                line,
            } => FileCommand {
                file_name,
                origin_str: origin_string,
                dest_str: dest_string,
                line,
                ..FileCommand::with_action(FileAction::Replace)
            },
            Commands::List | Commands::Show { .. } => return None,
        };
        Some(spec)
    }
}

impl TargetArgs {
    fn into_spec(self, action: FileAction) -> FileCommand {
        FileCommand {
            file_name: self.file_name,
            dir_name: self.dir_name,
            ..FileCommand::with_action(action)
        }
    }
}

/// Unsigned integer with the usual base prefixes (`0x`, `0o`, `0b`, or a bare
/// leading zero for octal). Single `_` separators between digits are allowed.
fn parse_privilege(value: &str) -> Result<u32, String> {
    let invalid = |reason: String| format!("invalid privilege {:?}: {}", value, reason);
    if value.starts_with('_') || value.ends_with('_') || value.contains("__") {
        return Err(invalid("misplaced digit separator".to_string()));
    }
    let digits = value.replace('_', "");
    let lower = digits.to_ascii_lowercase();

    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else if let Some(octal) = lower.strip_prefix("0o") {
        u32::from_str_radix(octal, 8)
    } else if let Some(binary) = lower.strip_prefix("0b") {
        u32::from_str_radix(binary, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        u32::from_str_radix(&lower[1..], 8)
    } else {
        lower.parse()
    };
    parsed.map_err(|err| invalid(err.to_string()))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(dir) = cli.journal {
        settings.journal_dir = dir;
    }
    if cli.uid.is_some() {
        settings.uid = cli.uid;
    }
    if cli.always_defaults {
        settings.defaults_policy = DefaultsPolicy::Always;
    }

    match cli.command {
        Commands::List => {
            let records = storage::list_records(&settings.journal_dir)?;
            println!("{}", "JOURNALED ATTACKS".bold().cyan());
            for record in &records {
                let action = FileCommand::from_recover_data(&record.recover_data)
                    .map(|spec| spec.common.action)
                    .unwrap_or_else(|_| "?".to_string());
                println!(
                    "  {}  {:6} {:8} {}",
                    record.uid, record.kind, action, record.created_at
                );
            }
            println!("  total: {}", records.len());
            Ok(EXIT_SUCCESS)
        }

        Commands::Show { uid } => {
            if let Err(err) = check_uid(&uid) {
                eprintln!("{} {}", "Error:".red().bold(), err);
                return Ok(EXIT_BAD_ARGS);
            }
            let record = storage::load_record(&settings.journal_dir, &uid)?;
            let spec = FileCommand::from_recover_data(&record.recover_data)?;
            println!("{}", format!("ATTACK {}", record.uid).bold().cyan());
            println!("  Kind: {}", record.kind);
            println!("  Mode: {:?}", record.mode);
            println!("  Created: {}", record.created_at);
            println!("  Specification:");
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(EXIT_SUCCESS)
        }

        command => {
            let Some(mut spec) = command.into_spec() else {
                return Ok(EXIT_SUCCESS);
            };
            if let Some(uid) = settings.uid {
                spec.common.uid = uid;
            }

            let executor = JournalExecutor::new(&settings.journal_dir);
            match attack::launch(
                &mut spec,
                settings.defaults_policy,
                &executor,
                ExecutionMode::Command,
            ) {
                Ok(uid) => {
                    println!(
                        "{}",
                        format!("Attack file successfully, uid: {}", uid).green()
                    );
                    Ok(EXIT_SUCCESS)
                }
                Err(err) => {
                    eprintln!("{} {:#}", "Error:".red().bold(), err);
                    Ok(err.exit_code())
                }
            }
        }
    }
}
