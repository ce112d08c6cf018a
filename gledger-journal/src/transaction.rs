use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::NaiveDate;

use crate::amount::Amount;
use crate::error::{JournalError, JournalResult};
use crate::posting::PostingRef;

pub type TransactionRef = Rc<RefCell<Transaction>>;
pub type TransactionWeak = Weak<RefCell<Transaction>>;

/// The cleared-state marker carried by a transaction header, `!` or `*`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    None,
    Uncleared,
    Cleared,
}

impl Default for State {
    fn default() -> Self {
        State::None
    }
}

impl From<char> for State {
    fn from(c: char) -> Self {
        match c {
            '!' => State::Uncleared,
            '*' => State::Cleared,
            _ => State::None,
        }
    }
}

/// A single dated, balanced movement of value between accounts.
///
/// Exactly one posting may arrive with an elided amount; [`Transaction::close`]
/// resolves it (see §4.3 of the balancing rules) before a `Transaction`
/// can be considered complete.
pub struct Transaction {
    pub date: NaiveDate,
    pub state: State,
    pub payee: String,
    pub postings: Vec<PostingRef>,
    pub header_note: Option<String>,
    pub body_notes: Vec<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, state: State, payee: String) -> Transaction {
        Transaction {
            date,
            state,
            payee,
            postings: Vec::new(),
            header_note: None,
            body_notes: Vec::new(),
        }
    }

    /// Balance `postings`: the sum of their quantities must be zero. If
    /// exactly one posting has an elided amount, it is resolved to the
    /// negated sum, inheriting the last non-empty commodity seen among
    /// its siblings. Two or more elided postings, or a non-zero sum
    /// with none elided, are both errors.
    pub fn balance(postings: &[PostingRef]) -> JournalResult<()> {
        let mut sum: i64 = 0;
        let mut elided_index: Option<usize> = None;
        let mut last_commodity = String::new();

        for (index, posting) in postings.iter().enumerate() {
            let posting = posting.borrow();
            match &posting.amount {
                Some(amount) => {
                    sum += amount.quantity;
                    if !amount.commodity.is_empty() {
                        last_commodity = amount.commodity.clone();
                    }
                }
                None => {
                    if elided_index.is_some() {
                        return Err(JournalError::MultipleElidedPostings);
                    }
                    elided_index = Some(index);
                }
            }
        }

        if sum == 0 {
            return Ok(());
        }

        match elided_index {
            Some(index) => {
                postings[index].borrow_mut().amount = Some(Amount {
                    quantity: -sum,
                    commodity: last_commodity,
                });
                Ok(())
            }
            None => Err(JournalError::TransactionDoesNotBalance {
                sum,
                commodity: last_commodity,
            }),
        }
    }

    /// Attach `posting` as this transaction's and set its back-reference.
    pub fn push_posting(self_ref: &TransactionRef, posting: PostingRef) {
        posting.borrow_mut().set_transaction(self_ref);
        self_ref.borrow_mut().postings.push(posting);
    }

    /// Append `posting` without establishing a back-reference. Used
    /// while assembling a [`crate::periodic::PeriodicTransaction`]'s
    /// body, which is never linked directly into the account tree (it
    /// either routes through the budget or is expanded into fresh,
    /// independently-linked transactions — see `gledger_journal::journal`).
    pub fn push_posting_detached(&mut self, posting: PostingRef) {
        self.postings.push(posting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::Posting;

    fn amount(q: i64, c: &str) -> Amount {
        Amount {
            quantity: q,
            commodity: c.to_string(),
        }
    }

    #[test]
    fn balances_when_sum_is_zero() {
        let postings = vec![
            Posting::new("Expenses:Food".into(), Some(amount(4281, "£"))),
            Posting::new("Assets:Current".into(), Some(amount(-4281, "£"))),
        ];
        assert!(Transaction::balance(&postings).is_ok());
    }

    #[test]
    fn resolves_single_elision() {
        let postings = vec![
            Posting::new("Expenses:Food".into(), Some(amount(4281, "£"))),
            Posting::new("Assets:Current".into(), None),
        ];
        Transaction::balance(&postings).unwrap();
        let resolved = postings[1].borrow().amount.clone().unwrap();
        assert_eq!(resolved.quantity, -4281);
        assert_eq!(resolved.commodity, "£");
    }

    #[test]
    fn rejects_two_elided_postings() {
        let postings = vec![
            Posting::new("Expenses:Food".into(), None),
            Posting::new("Assets:Current".into(), None),
        ];
        assert_eq!(
            Transaction::balance(&postings).unwrap_err(),
            JournalError::MultipleElidedPostings
        );
    }

    #[test]
    fn rejects_unbalanced_transaction_with_no_elision() {
        let postings = vec![
            Posting::new("Expenses:Food".into(), Some(amount(4281, "£"))),
            Posting::new("Assets:Current".into(), Some(amount(-100, "£"))),
        ];
        assert!(matches!(
            Transaction::balance(&postings).unwrap_err(),
            JournalError::TransactionDoesNotBalance { .. }
        ));
    }
}
