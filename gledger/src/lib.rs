//! `gledger`'s CLI front end: flag parsing, journal-path/window
//! resolution, filter construction, and the six reporting subcommands
//! named in spec.md §6. Everything upstream of here — lexing, grammar,
//! the account tree, the envelope-budget projection — lives in
//! `gledger-parser` and `gledger-journal`; this crate is a thin,
//! testable collaborator over both, matching the role the distilled
//! spec assigns the CLI (§1: "out of scope except as external
//! collaborators whose interfaces are named in §6").

pub mod cli;
pub mod commands;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod report;

use std::env;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use cli::{Cli, Command};
use error::{CliError, CliResult};
use ingest::Window;

/// Resolve the journal path: `--file` if given, else `$LEDGER_FILE`.
pub fn resolve_journal_path(file: Option<PathBuf>) -> CliResult<PathBuf> {
    if let Some(file) = file {
        return Ok(file);
    }
    env::var_os("LEDGER_FILE").map(PathBuf::from).ok_or(CliError::NoJournalFile)
}

/// Resolve `--begin`/`--end`/`--current` into an ingestion [`Window`].
/// `--current` overrides `--begin`/`--end` with the bounds of the
/// current calendar month, matching the smart-date parser's own
/// "defaults the unspecified component" behavior (spec.md §4.3) rather
/// than layering a second, inconsistent convention on top of it.
pub fn resolve_window(begin: Option<&str>, end: Option<&str>, current: bool, today: NaiveDate) -> CliResult<Window> {
    if current {
        let start = gledger_journal::budget::normalize_month(today);
        let end = next_month(start);
        return Ok(Window { start: Some(start), end: Some(end.pred_opt().unwrap_or(end)) });
    }

    let start = begin
        .map(|s| gledger_parser::parse_smart_date(s, today))
        .transpose()
        .map_err(|e| CliError::Date(begin.unwrap_or_default().to_string(), e.to_string()))?;
    let end = end
        .map(|s| gledger_parser::parse_smart_date(s, today))
        .transpose()
        .map_err(|e| CliError::Date(end.unwrap_or_default().to_string(), e.to_string()))?;
    Ok(Window { start, end })
}

fn next_month(date: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap()
    }
}

/// Parse `cli`, ingest the resolved journal, and dispatch to the
/// subcommand's report. The single entry point `main.rs` calls.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let path = resolve_journal_path(cli.file)?;
    let today = Local::now().date_naive();
    let window = resolve_window(cli.begin.as_deref(), cli.end.as_deref(), cli.current, today)?;

    match cli.command {
        Command::Balance { flatten, show_zero, show_budget, collapse, filters } => {
            commands::balance::run(&path, window, flatten, show_zero, show_budget, collapse, &filters)
        }
        Command::Budget { flatten, show_zero, collapse, filters } => {
            commands::budget::run(&path, window, flatten, show_zero, collapse, &filters)
        }
        Command::Print { filters } => commands::print::run(&path, window, &filters),
        Command::Accounts { filters } => commands::accounts::run(&path, window, &filters),
        Command::Payees { filters } => commands::payees::run(&path, window, &filters),
        Command::Statistics => commands::statistics::run(&path, window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_journal_path_prefers_explicit_file() {
        let resolved = resolve_journal_path(Some(PathBuf::from("a.ledger"))).unwrap();
        assert_eq!(resolved, PathBuf::from("a.ledger"));
    }

    #[test]
    fn resolve_window_current_spans_the_calendar_month() {
        let today = NaiveDate::from_ymd_opt(2020, 2, 15).unwrap();
        let window = resolve_window(None, None, true, today).unwrap();
        assert_eq!(window.start, Some(NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()));
        assert_eq!(window.end, Some(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()));
    }

    #[test]
    fn resolve_window_passes_smart_dates_through() {
        let today = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let window = resolve_window(Some("2020-06"), Some("2020-09"), false, today).unwrap();
        assert_eq!(window.start, Some(NaiveDate::from_ymd_opt(2020, 6, 1).unwrap()));
        assert_eq!(window.end, Some(NaiveDate::from_ymd_opt(2020, 9, 1).unwrap()));
    }
}
