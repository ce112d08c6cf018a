//! Filter argument construction (`reporting/filter.go`'s Rust
//! equivalent): a leading sigil selects which part of a transaction a
//! pattern matches against, and a pattern with no uppercase letter is
//! compiled case-insensitively so that typing `foo` on the command line
//! still matches `Food`.

use regex::Regex;

use crate::error::{CliError, CliResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FilterKind {
    AccountName,
    Payee,
    Note,
}

pub struct Filter {
    kind: FilterKind,
    regex: Regex,
}

/// Does `s` contain any uppercase letter? Determines whether a filter
/// pattern is compiled case-sensitively or not.
pub fn contains_uppercase(s: &str) -> bool {
    s.chars().any(|c| c.is_uppercase())
}

impl Filter {
    pub fn new(arg: &str) -> CliResult<Filter> {
        let (kind, pattern) = match arg.chars().next() {
            Some('@') => (FilterKind::Payee, &arg[1..]),
            Some('=') => (FilterKind::Note, &arg[1..]),
            _ => (FilterKind::AccountName, arg),
        };
        let pattern = if contains_uppercase(pattern) {
            pattern.to_string()
        } else {
            format!("(?i){pattern}")
        };
        let regex = Regex::new(&pattern).map_err(|source| CliError::InvalidFilter {
            pattern: arg.to_string(),
            source,
        })?;
        Ok(Filter { kind, regex })
    }

    pub fn matches_string(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }

    /// Does this filter match any part of `transaction` it cares about?
    /// An account-name filter matches any posting on the transaction; a
    /// note filter checks the header note, body notes, and every
    /// posting's comments.
    pub fn matches_transaction(&self, transaction: &gledger_journal::Transaction) -> bool {
        match self.kind {
            FilterKind::Payee => self.regex.is_match(&transaction.payee),
            FilterKind::Note => {
                if let Some(note) = &transaction.header_note {
                    if self.regex.is_match(note) {
                        return true;
                    }
                }
                if transaction.body_notes.iter().any(|n| self.regex.is_match(n)) {
                    return true;
                }
                transaction.postings.iter().any(|p| {
                    p.borrow().comments.iter().any(|c| self.regex.is_match(c))
                })
            }
            FilterKind::AccountName => transaction
                .postings
                .iter()
                .any(|p| self.regex.is_match(&p.borrow().account_path)),
        }
    }
}

/// Compile every `arg` into a [`Filter`]; an empty `args` means "no
/// filtering" (every caller treats an empty filter list as match-all).
pub fn compile(args: &[String]) -> CliResult<Vec<Filter>> {
    args.iter().map(|a| Filter::new(a)).collect()
}

pub fn matches_any_string(filters: &[Filter], s: &str) -> bool {
    filters.is_empty() || filters.iter().any(|f| f.matches_string(s))
}

pub fn matches_any_transaction(filters: &[Filter], t: &gledger_journal::Transaction) -> bool {
    filters.is_empty() || filters.iter().any(|f| f.matches_transaction(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_pattern_matches_case_insensitively() {
        let filter = Filter::new("foo").unwrap();
        assert!(filter.matches_string("Food"));
    }

    #[test]
    fn uppercase_pattern_is_case_sensitive() {
        let filter = Filter::new("Foo").unwrap();
        assert!(!filter.matches_string("food"));
        assert!(filter.matches_string("Food"));
    }

    #[test]
    fn payee_sigil_matches_payee_not_account() {
        use gledger_journal::{Posting, State, Transaction};

        let mut t = Transaction::new(
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            State::None,
            "Tesco".to_string(),
        );
        t.postings.push(Posting::new("Expenses:Food".into(), None));

        let filter = Filter::new("@tesco").unwrap();
        assert!(filter.matches_transaction(&t));

        let filter = Filter::new("tesco").unwrap();
        assert!(!filter.matches_transaction(&t));
    }
}
