use thiserror::Error;

use crate::account::AccountPath;

/// Errors raised while assembling or querying the in-memory journal.
///
/// Lexing and grammar errors live in `gledger-parser::ParseError`; this
/// enum covers the smaller set of things that can go wrong once a
/// transaction has already been lexically well-formed but fails a
/// bookkeeping invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JournalError {
    #[error("transaction does not balance: postings sum to {sum} {commodity}")]
    TransactionDoesNotBalance { sum: i64, commodity: String },

    #[error("transaction has more than one posting with an elided amount")]
    MultipleElidedPostings,

    #[error("unknown account: {0}")]
    UnknownAccount(AccountPath),
}

pub type JournalResult<T> = Result<T, JournalError>;
