//! `payees`: lists every unique payee, sorted, optionally filtered
//! (`cmd/payees.go`).

use std::collections::BTreeSet;
use std::path::Path;

use crate::commands::ingest_journal;
use crate::filter::{self, matches_any_string};
use crate::ingest::Window;

pub fn run(path: &Path, window: Window, filter_args: &[String]) -> anyhow::Result<()> {
    let journal = ingest_journal(path, window, false)?;
    let filters = filter::compile(filter_args)?;

    let mut payees: BTreeSet<String> = BTreeSet::new();
    for t in &journal.transactions {
        payees.insert(t.borrow().payee.clone());
    }

    for payee in payees.iter().filter(|p| matches_any_string(&filters, p)) {
        println!("{payee}");
    }
    Ok(())
}
