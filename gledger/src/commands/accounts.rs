//! `accounts`: lists every unique account path touched by a posting,
//! sorted, optionally filtered (`cmd/accounts.go`).

use std::collections::BTreeSet;
use std::path::Path;

use crate::commands::ingest_journal;
use crate::filter::{self, matches_any_string};
use crate::ingest::Window;

pub fn run(path: &Path, window: Window, filter_args: &[String]) -> anyhow::Result<()> {
    let journal = ingest_journal(path, window, false)?;
    let filters = filter::compile(filter_args)?;

    let mut paths: BTreeSet<String> = BTreeSet::new();
    for t in &journal.transactions {
        for posting in &t.borrow().postings {
            paths.insert(posting.borrow().account_path.clone());
        }
    }

    for path in paths.iter().filter(|p| matches_any_string(&filters, p)) {
        println!("{path}");
    }
    Ok(())
}
