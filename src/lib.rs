// SPDX-License-Identifier: PMPL-1.0-or-later

//! File-Chaos: file-system fault injection specifications.
//!
//! An operator describes a file fault (create, modify privilege, delete,
//! rename, append, replace). The specification is completed with defaults,
//! validated, and handed to an executor, which journals a recovery record
//! so the fault can be reversed later.
//!
//! MODULES:
//! 1. **attack**: file attack specifications, the defaults policy and the
//!    executor contract.
//! 2. **storage**: the recovery journal.
//! 3. **config**: settings files for the CLI.

pub mod attack;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;
