use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::account::{Account, AccountRef, BUDGET_ROOT_NAME};
use crate::amount::Amount;

/// The implicit source account for budget allocations: the pool that
/// income replenishes and envelope allocations draw down (GLOSSARY,
/// "To Be Budgeted").
pub const TO_BE_BUDGETED: &str = "To Be Budgeted";

/// Normalize `date` to the first day of its month — the bucket key for
/// the per-month envelope/expense/income trees.
pub fn normalize_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("a valid date's year/month always has a 1st")
}

/// The three parallel account trees kept for a single calendar month
/// (§3 Budget / BudgetMonth).
pub struct BudgetMonth {
    pub envelope_root: AccountRef,
    pub expense_root: AccountRef,
    pub income_root: AccountRef,
}

impl BudgetMonth {
    fn new() -> Self {
        BudgetMonth {
            envelope_root: Account::new_root(BUDGET_ROOT_NAME),
            expense_root: Account::new_root(BUDGET_ROOT_NAME),
            income_root: Account::new_root(BUDGET_ROOT_NAME),
        }
    }

    /// The remaining envelope balance for `path`: `EnvelopeRoot[path] +
    /// ExpenseRoot[path]`, positive meaning unspent (§4.6 invariant).
    pub fn remaining(&self, path: &str) -> Amount {
        let envelope = Account::find_or_create_path(&self.envelope_root, path);
        let expense = Account::find_or_create_path(&self.expense_root, path);
        let envelope = envelope.borrow().amount.clone();
        let expense = expense.borrow().amount.clone();
        let commodity = if !envelope.commodity.is_empty() {
            envelope.commodity
        } else {
            expense.commodity
        };
        Amount {
            quantity: envelope.quantity + expense.quantity,
            commodity,
        }
    }
}

/// The envelope-budget projection: a calendar-month-keyed set of three
/// parallel account trees (§3, §4.6). Constructed only when a
/// [`crate::journal::ProcessingConfig`] requests it.
#[derive(Default)]
pub struct Budget {
    months: BTreeMap<NaiveDate, BudgetMonth>,
}

impl Budget {
    pub fn new() -> Self {
        Budget {
            months: BTreeMap::new(),
        }
    }

    pub fn month(&self, date: NaiveDate) -> Option<&BudgetMonth> {
        self.months.get(&normalize_month(date))
    }

    pub fn months(&self) -> impl Iterator<Item = (&NaiveDate, &BudgetMonth)> {
        self.months.iter()
    }

    fn month_mut(&mut self, date: NaiveDate) -> &mut BudgetMonth {
        self.months
            .entry(normalize_month(date))
            .or_insert_with(BudgetMonth::new)
    }

    /// Allocate `amount` to the envelope named by `path` — an
    /// already-envelope-style path (e.g. `Food`, or the implicit
    /// `To Be Budgeted` counter-posting), as produced by a
    /// `None`-interval [`crate::periodic::PeriodicTransaction`].
    pub fn add_envelope_posting(&mut self, date: NaiveDate, path: &str, amount: &Amount) {
        let month = self.month_mut(date);
        let account = Account::find_or_create_path(&month.envelope_root, path);
        Account::add_amount_up_chain(&account, amount);
    }

    /// Route spending under `Expenses:<path>` into `ExpenseRoot[path]`,
    /// sign-inverted so that `EnvelopeRoot[path] + ExpenseRoot[path]`
    /// is the remaining balance.
    pub fn add_expense_posting(&mut self, date: NaiveDate, path: &str, amount: &Amount) {
        let month = self.month_mut(date);
        let account = Account::find_or_create_path(&month.expense_root, path);
        Account::add_amount_up_chain(&account, &amount.negated());
    }

    /// Route receipts under `Income:<path>` into the month's Income
    /// tree, and replenish `To Be Budgeted` by the same amount. Income
    /// postings arrive with a negative quantity (the credit side of a
    /// double entry), so both legs are sign-inverted to read as a
    /// positive inflow — see DESIGN.md for why this direction was
    /// chosen over leaving the sign as posted.
    pub fn add_income_posting(&mut self, date: NaiveDate, path: &str, amount: &Amount) {
        let inflow = amount.negated();
        let month = self.month_mut(date);
        let income_path = if path.is_empty() { "Income" } else { path };
        let income_account = Account::find_or_create_path(&month.income_root, income_path);
        Account::add_amount_up_chain(&income_account, &inflow);
        let to_be_budgeted = Account::find_or_create_path(&month.envelope_root, TO_BE_BUDGETED);
        Account::add_amount_up_chain(&to_be_budgeted, &inflow);
    }
}
