use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::account::{Account, AccountRef, ROOT_NAME};
use crate::budget::Budget;
use crate::error::JournalResult;
use crate::periodic::{Interval, PeriodicTransaction};
use crate::posting::PostingRef;
use crate::transaction::{Transaction, TransactionRef};

/// Process-wide knobs threaded explicitly into [`Journal::new`], in
/// place of the "global mutable state" the original CLI flag variables
/// amounted to (design notes, §9).
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessingConfig {
    pub calculate_budget: bool,
}

/// Owns the account tree, the list of delivered transactions, and (when
/// enabled) the envelope-budget projection. Everything else in the
/// model — accounts, postings, budget month trees — is reachable only
/// through a `Journal`.
pub struct Journal {
    pub config: ProcessingConfig,
    pub root: AccountRef,
    pub transactions: Vec<TransactionRef>,
    pub file_paths: Vec<String>,
    pub budget: Option<Budget>,
}

impl Journal {
    pub fn new(config: ProcessingConfig) -> Self {
        Journal {
            config,
            root: Account::new_root(ROOT_NAME),
            transactions: Vec::new(),
            file_paths: Vec::new(),
            budget: if config.calculate_budget {
                Some(Budget::new())
            } else {
                None
            },
        }
    }

    pub fn find_or_create_account(&self, path: &str) -> AccountRef {
        Account::find_or_create_path(&self.root, path)
    }

    /// Record a completed, already-balanced transaction: links each of
    /// its postings into the account tree (§4.5) and, when budgeting is
    /// enabled, into the Expense/Income trees (§4.6).
    pub fn add_transaction(&mut self, transaction: TransactionRef, path: &str) -> JournalResult<()> {
        if !self.file_paths.iter().any(|p| p == path) {
            self.file_paths.push(path.to_string());
        }

        let date = transaction.borrow().date;
        let postings: Vec<PostingRef> = transaction.borrow().postings.clone();
        for posting in &postings {
            self.add_posting(posting, date)?;
        }

        self.transactions.push(transaction);
        Ok(())
    }

    /// Link `posting` into the root tree (resolving its account on
    /// first link), then route it into the budget projection when the
    /// posting's head component is `Expenses` or `Income`.
    pub fn add_posting(&mut self, posting: &PostingRef, date: NaiveDate) -> JournalResult<()> {
        let account = match posting.borrow().account() {
            Some(account) => account,
            None => {
                let path = posting.borrow().account_path.clone();
                let account = self.find_or_create_account(&path);
                posting.borrow_mut().set_account(&account);
                account
            }
        };

        {
            let transaction = posting.borrow().transaction();
            let mut account = account.borrow_mut();
            account.postings.push(posting.clone());
            if let Some(transaction) = transaction {
                account.transactions.push(transaction);
            }
        }

        let amount = posting.borrow().amount.clone();
        let amount = match amount {
            Some(amount) => amount,
            None => return Ok(()),
        };
        Account::add_amount_up_chain(&account, &amount);

        if self.config.calculate_budget {
            let path = posting.borrow().account_path.clone();
            let mut components = path.splitn(2, ':');
            let head = components.next().unwrap_or_default();
            let rest = components.next().unwrap_or_default();
            let budget = self.budget.as_mut().expect("calculate_budget implies Some(Budget)");
            match head {
                "Expenses" => budget.add_expense_posting(date, rest, &amount),
                "Income" => budget.add_income_posting(date, rest, &amount),
                _ => {}
            }
        }

        Ok(())
    }

    /// A `None`-interval periodic transaction is a budget allocation:
    /// every posting in its (already-balanced) body, including the
    /// implicit `To Be Budgeted` counter-posting, is fed to the
    /// envelope tree for `Period.start_date`'s month. Any other
    /// interval is expanded (§4.6) into concrete transactions over
    /// `window` and routed through [`Journal::add_posting`] as usual —
    /// currently always empty, per the open question on interval
    /// expansion (design notes, §9).
    pub fn add_periodic_transaction(
        &mut self,
        pt: PeriodicTransaction,
        path: &str,
        window: (Option<NaiveDate>, Option<NaiveDate>),
    ) -> JournalResult<()> {
        if !self.file_paths.iter().any(|p| p == path) {
            self.file_paths.push(path.to_string());
        }

        if pt.is_budget_allocation() {
            if !self.config.calculate_budget {
                return Ok(());
            }
            let date = pt.period.start_date;
            let budget = self.budget.as_mut().expect("calculate_budget implies Some(Budget)");
            for posting in &pt.transaction.postings {
                let posting = posting.borrow();
                if let Some(amount) = &posting.amount {
                    budget.add_envelope_posting(date, &posting.account_path, amount);
                }
            }
            return Ok(());
        }

        for transaction in pt.expand(window.0, window.1) {
            let transaction_ref: TransactionRef = Rc::new(RefCell::new(transaction));
            let postings: Vec<PostingRef> = transaction_ref.borrow().postings.clone();
            let date = transaction_ref.borrow().date;
            for posting in &postings {
                self.add_posting(posting, date)?;
            }
            self.transactions.push(transaction_ref);
        }
        Ok(())
    }
}

/// Construct a closed, linked [`TransactionRef`] out of an
/// already-balanced [`Transaction`] value. Used by the parser driver
/// once a periodic transaction has been expanded into a concrete one.
pub fn to_transaction_ref(transaction: Transaction) -> TransactionRef {
    Rc::new(RefCell::new(transaction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::posting::Posting;
    use crate::transaction::State;

    fn amt(q: i64, c: &str) -> Amount {
        Amount::builder().quantity(q).commodity(c.to_string()).build()
    }

    fn make_transaction(date: NaiveDate, postings: Vec<(&str, Option<Amount>)>) -> TransactionRef {
        let transaction_ref: TransactionRef =
            Rc::new(RefCell::new(Transaction::new(date, State::Cleared, "A shop".into())));
        for (path, amount) in postings {
            let posting = Posting::new(path.to_string(), amount);
            Transaction::push_posting(&transaction_ref, posting);
        }
        transaction_ref
    }

    #[test]
    fn simple_balanced_transaction_aggregates_up_the_tree() {
        let mut journal = Journal::new(ProcessingConfig::default());
        let date = NaiveDate::from_ymd_opt(2020, 10, 11).unwrap();
        let transaction = make_transaction(
            date,
            vec![
                ("Expenses:Food", Some(amt(4281, "£"))),
                ("Assets:Current", Some(amt(-4281, "£"))),
            ],
        );
        journal.add_transaction(transaction, "root.ledger").unwrap();

        assert_eq!(journal.root.borrow().amount.quantity, 0);
        let expenses = journal.find_or_create_account("Expenses");
        assert_eq!(expenses.borrow().amount.quantity, 4281);
        let food = journal.find_or_create_account("Expenses:Food");
        assert_eq!(food.borrow().amount.quantity, 4281);
        let assets = journal.find_or_create_account("Assets");
        assert_eq!(assets.borrow().amount.quantity, -4281);
    }

    #[test]
    fn budget_projection_tracks_remaining_envelope() {
        let mut journal = Journal::new(ProcessingConfig { calculate_budget: true });
        let date = NaiveDate::from_ymd_opt(2020, 10, 1).unwrap();

        let allocation = Transaction::new(date, State::None, String::new());
        let allocation_ref: TransactionRef = Rc::new(RefCell::new(allocation));
        Transaction::push_posting(&allocation_ref, Posting::new("Food".into(), Some(amt(20000, "£"))));
        Transaction::push_posting(
            &allocation_ref,
            Posting::new("To Be Budgeted".into(), Some(amt(-20000, "£"))),
        );
        let pt = PeriodicTransaction::new(
            Rc::try_unwrap(allocation_ref).unwrap().into_inner(),
            crate::periodic::Period {
                start_date: date,
                end_date: None,
                interval: Interval::None,
                interval_frequency: 1,
            },
        );
        journal.add_periodic_transaction(pt, "budget.ledger", (None, None)).unwrap();

        let transaction = make_transaction(
            NaiveDate::from_ymd_opt(2020, 10, 11).unwrap(),
            vec![
                ("Expenses:Food", Some(amt(4281, "£"))),
                ("Assets:Current", Some(amt(-4281, "£"))),
            ],
        );
        journal.add_transaction(transaction, "root.ledger").unwrap();

        let month = journal.budget.as_ref().unwrap().month(date).unwrap();
        assert_eq!(month.remaining("Food").quantity, 15719);
    }
}
