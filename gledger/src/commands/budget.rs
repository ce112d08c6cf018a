//! `budget`: renders the envelope-budget projection (spec.md §4.6) per
//! calendar month, each account line showing the remaining envelope
//! balance (`EnvelopeRoot[path] + ExpenseRoot[path]`) rather than a bare
//! allocation or a bare expense total (`cmd/budget.go`).

use std::path::Path;

use gledger_journal::account::Account;
use gledger_journal::budget::Budget;

use crate::commands::ingest_journal;
use crate::filter::{self, matches_any_string};
use crate::ingest::Window;
use crate::report::{render_flattened, render_tree};

/// A prepender over `month`'s envelope tree that substitutes the
/// remaining balance (envelope + expense, §4.6's invariant) for the
/// bare allocation `amount_prepender` would otherwise show.
fn remaining_prepender(month: &gledger_journal::BudgetMonth) -> impl Fn(&Account) -> String + '_ {
    move |a: &Account| {
        let remaining = month.remaining(a.path());
        format!("{:>20}  ", remaining.displayable_quantity(true))
    }
}

/// Render every month present in `budget`, oldest first.
pub fn render_all_months(budget: &Budget, flatten: bool, collapse: bool) -> String {
    let mut sections = Vec::new();
    for (month, bucket) in budget.months() {
        let prepender = remaining_prepender(bucket);
        let body = if flatten {
            render_flattened(&bucket.envelope_root, &prepender)
        } else {
            render_tree(&bucket.envelope_root, &prepender, collapse)
        };
        sections.push(format!("{}\n{}", month.format("%Y-%m"), body));
    }
    sections.join("\n\n")
}

pub fn run(path: &Path, window: Window, flatten: bool, show_zero: bool, collapse: bool, filter_args: &[String]) -> anyhow::Result<()> {
    let journal = ingest_journal(path, window, true)?;
    let filters = filter::compile(filter_args)?;

    let Some(budget) = &journal.budget else {
        println!("(no budget allocations in this journal)");
        return Ok(());
    };

    for (_, bucket) in budget.months() {
        if !show_zero {
            Account::remove_empty_children(&bucket.envelope_root);
        }
        if !filters.is_empty() {
            Account::remove_children(&bucket.envelope_root, &|a: &Account| matches_any_string(&filters, a.path()));
        }
    }

    println!("{}", render_all_months(budget, flatten, collapse));
    Ok(())
}
