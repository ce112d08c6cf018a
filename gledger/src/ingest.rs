//! Wires `gledger-parser`'s include-aware driver to a `gledger-journal`
//! `Journal`: the glue every reporting command shares, grounded in the
//! original `cmd/common.go`'s `parse()` helper, which every subcommand
//! called before building its own report.

use std::path::Path;

use chrono::NaiveDate;
use gledger_journal::periodic::PeriodicTransaction;
use gledger_journal::transaction::TransactionRef;
use gledger_journal::Journal;
use gledger_parser::{ParseResult, Parser, TransactionHandler};

/// The `--begin`/`--end` (or `--current`) window a subcommand restricts
/// ingestion to. `None` on either end means unbounded, matching
/// `PeriodicTransaction::expand`'s "empty inputs mean no bound" contract
/// (spec.md §4.6).
#[derive(Clone, Copy, Debug, Default)]
pub struct Window {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Window {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Feeds every closed transaction into `journal`, skipping transactions
/// whose date falls outside `window`. Periodic transactions always
/// reach the journal (budget allocations aren't date-windowed; recurring
/// expansion is handed the window directly so it can bound its own
/// enumeration).
struct JournalHandler<'j> {
    journal: &'j mut Journal,
    window: Window,
}

impl<'j> TransactionHandler for JournalHandler<'j> {
    fn handle_transaction(&mut self, transaction: TransactionRef, path: &Path) -> ParseResult<()> {
        let date = transaction.borrow().date;
        if !self.window.contains(date) {
            return Ok(());
        }
        self.journal
            .add_transaction(transaction, &path.display().to_string())
            .map_err(Into::into)
    }

    fn handle_periodic_transaction(
        &mut self,
        periodic: PeriodicTransaction,
        path: &Path,
    ) -> ParseResult<()> {
        self.journal
            .add_periodic_transaction(periodic, &path.display().to_string(), (self.window.start, self.window.end))
            .map_err(Into::into)
    }
}

/// Parse `root` (and everything it transitively `include`s) into
/// `journal`, restricted to `window`.
pub fn ingest(journal: &mut Journal, root: &Path, window: Window) -> ParseResult<()> {
    let mut handler = JournalHandler { journal, window };
    let mut parser = Parser::new(&mut handler);
    parser.parse(root)
}
