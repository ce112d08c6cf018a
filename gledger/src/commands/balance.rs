//! `balance`: walks the root account tree, optionally prunes zero
//! balances and non-matching accounts, and renders it as a tree or
//! flattened list (`cmd/balance.go`).

use std::path::Path;

use gledger_journal::account::Account;

use crate::commands::{budget as budget_report, ingest_journal};
use crate::filter::{self, matches_any_string};
use crate::ingest::Window;
use crate::report::{amount_prepender, render_flattened, render_tree};

#[allow(clippy::too_many_arguments)]
pub fn run(
    path: &Path,
    window: Window,
    flatten: bool,
    show_zero: bool,
    show_budget: bool,
    collapse: bool,
    filter_args: &[String],
) -> anyhow::Result<()> {
    let journal = ingest_journal(path, window, show_budget)?;
    let filters = filter::compile(filter_args)?;

    if !show_zero {
        Account::remove_empty_children(&journal.root);
    }
    if !filters.is_empty() {
        Account::remove_children(&journal.root, &|a: &Account| matches_any_string(&filters, a.path()));
    }

    let rendered = if flatten {
        render_flattened(&journal.root, &amount_prepender)
    } else {
        render_tree(&journal.root, &amount_prepender, collapse)
    };
    println!("{rendered}");
    println!("{}", "-".repeat(20));
    println!("{:>20}", journal.root.borrow().amount.displayable_quantity(false));

    if show_budget {
        if let Some(budget) = &journal.budget {
            println!();
            println!("{}", budget_report::render_all_months(budget, flatten, collapse));
        }
    }

    Ok(())
}
