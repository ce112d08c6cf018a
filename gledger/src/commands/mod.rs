//! The reporting subcommands named in spec.md §6: thin collaborators
//! over `gledger-journal`'s account tree and budget projection, built
//! directly from the original `cmd/balance.go`, `cmd/budget.go`,
//! `cmd/print.go`, `cmd/accounts.go`, `cmd/payees.go`, and `cmd/stats.go`.

pub mod accounts;
pub mod balance;
pub mod budget;
pub mod payees;
pub mod print;
pub mod statistics;

use std::path::Path;

use gledger_journal::{Journal, ProcessingConfig};

use crate::ingest::{self, Window};

/// Ingest `path` into a fresh [`Journal`], the shared first step of
/// every subcommand (`cmd/common.go`'s `parse()` helper).
pub fn ingest_journal(path: &Path, window: Window, calculate_budget: bool) -> anyhow::Result<Journal> {
    let mut journal = Journal::new(ProcessingConfig { calculate_budget });
    ingest::ingest(&mut journal, path, window)?;
    Ok(journal)
}
