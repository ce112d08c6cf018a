//! Parser-level errors (§7). Every variant here is raised bare, with no
//! location information; [`ParseError::with_context`] decorates it with
//! a `path:line` prefix exactly once, at the outer driver loop in
//! [`crate::parser::Parser`] — never re-wrapped as it bubbles back out
//! through nested `include` frames.

use thiserror::Error;

use gledger_journal::JournalError;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Lex(String),

    #[error("expected one of {expected} but found {found}")]
    BuilderState { expected: String, found: String },

    #[error("malformed date {0:?}")]
    Date(String),

    #[error("malformed amount {0:?}")]
    Amount(String),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error("cannot resolve include {path:?}: {reason}")]
    Include { path: String, reason: String },

    #[error("{path}:{line}: {source}")]
    WithContext {
        path: String,
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    pub fn io(e: std::io::Error) -> Self {
        ParseError::Io(e.to_string())
    }

    pub fn lex(message: impl Into<String>) -> Self {
        ParseError::Lex(message.into())
    }

    pub fn builder_state(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ParseError::BuilderState { expected: expected.into(), found: found.into() }
    }

    pub fn date(message: impl Into<String>) -> Self {
        ParseError::Date(message.into())
    }

    pub fn amount(message: impl Into<String>) -> Self {
        ParseError::Amount(message.into())
    }

    pub fn include(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::Include { path: path.into(), reason: reason.into() }
    }

    /// Attach `path:line` context, unless this error already carries
    /// some (from a deeper `include` frame).
    pub fn with_context(self, path: impl Into<String>, line: usize) -> Self {
        match self {
            ParseError::WithContext { .. } => self,
            other => ParseError::WithContext { path: path.into(), line, source: Box::new(other) },
        }
    }
}
