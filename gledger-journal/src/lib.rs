//! The data model and aggregation engine for `gledger`: accounts,
//! postings, transactions, periodic transactions, and the
//! envelope-budget projection built on top of them.
//!
//! This crate never reads a byte of journal source itself — that's
//! `gledger-parser`'s job. It owns only the in-memory structures a
//! completed, already-balanced transaction is linked into.

pub mod account;
pub mod amount;
pub mod budget;
pub mod error;
pub mod journal;
pub mod periodic;
pub mod posting;
pub mod transaction;

pub use account::{Account, AccountRef};
pub use amount::{Amount, IncompleteAmount};
pub use budget::{Budget, BudgetMonth};
pub use error::{JournalError, JournalResult};
pub use journal::{Journal, ProcessingConfig};
pub use periodic::{Interval, Period, PeriodicTransaction};
pub use posting::{Posting, PostingRef};
pub use transaction::{State, Transaction, TransactionRef};
