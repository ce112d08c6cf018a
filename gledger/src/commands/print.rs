//! `print`: renders every ingested transaction, sorted by date, in the
//! grammar's own surface syntax (`cmd/print.go`).

use std::path::Path;

use gledger_journal::transaction::{State, TransactionRef};

use crate::commands::ingest_journal;
use crate::filter::{self, matches_any_transaction};
use crate::ingest::Window;

fn state_marker(state: State) -> &'static str {
    match state {
        State::None => "",
        State::Uncleared => " !",
        State::Cleared => " *",
    }
}

fn render_transaction(t: &TransactionRef) -> String {
    let t = t.borrow();
    let mut out = format!("{}{} {}", t.date.format("%Y-%m-%d"), state_marker(t.state), t.payee);
    if let Some(note) = &t.header_note {
        out.push_str("  ; ");
        out.push_str(note);
    }
    for posting in &t.postings {
        let posting = posting.borrow();
        out.push_str("\n\t");
        out.push_str(&posting.account_path);
        if let Some(amount) = &posting.amount {
            out.push_str("  ");
            out.push_str(&amount.displayable_quantity(true));
        }
    }
    out
}

pub fn run(path: &Path, window: Window, filter_args: &[String]) -> anyhow::Result<()> {
    let journal = ingest_journal(path, window, false)?;
    let filters = filter::compile(filter_args)?;

    let mut transactions = journal.transactions.clone();
    transactions.sort_by_key(|t| t.borrow().date);

    for t in &transactions {
        if matches_any_transaction(&filters, &t.borrow()) {
            println!("{}", render_transaction(t));
            println!();
        }
    }
    Ok(())
}
