use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::account::{AccountPath, AccountRef, AccountWeak};
use crate::amount::{Amount, IncompleteAmount};
use crate::transaction::TransactionWeak;

pub type PostingRef = Rc<RefCell<Posting>>;

/// A single line of a transaction: a movement of an amount into or out
/// of one account.
///
/// A posting is parsed with only an `account_path` string; the
/// `account` back-reference is filled in during the link phase, once
/// the account tree exists to resolve it against (see the design notes
/// on mutable cross-references).
pub struct Posting {
    transaction: Option<TransactionWeak>,
    account: Option<AccountWeak>,

    pub account_path: AccountPath,
    pub amount: Option<Amount>,
    pub comments: Vec<String>,
}

impl Posting {
    pub fn new(account_path: AccountPath, amount: Option<Amount>) -> PostingRef {
        Rc::new(RefCell::new(Posting {
            transaction: None,
            account: None,
            account_path,
            amount,
            comments: Vec::new(),
        }))
    }

    pub fn from_incomplete(account_path: AccountPath, units: IncompleteAmount) -> PostingRef {
        Rc::new(RefCell::new(Posting {
            transaction: None,
            account: None,
            account_path,
            amount: units.into_amount(None),
            comments: Vec::new(),
        }))
    }

    pub fn transaction(&self) -> Option<crate::transaction::TransactionRef> {
        self.transaction.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_transaction(&mut self, transaction: &crate::transaction::TransactionRef) {
        self.transaction = Some(Rc::downgrade(transaction));
    }

    pub fn account(&self) -> Option<AccountRef> {
        self.account.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_account(&mut self, account: &AccountRef) {
        self.account = Some(Rc::downgrade(account));
    }

    pub fn is_elided(&self) -> bool {
        self.amount.is_none()
    }
}
