//! CLI-level error type. Ingestion errors (`gledger_parser::ParseError`,
//! which itself wraps `gledger_journal::JournalError`) and filter-regex
//! errors both surface to the same exit path, decorated with
//! `anyhow::Context` at the point a file was opened — the way
//! `rustledger`'s `bean-doctor` attaches `with_context` to its file reads
//! rather than growing its own wrapper enum for "couldn't read the file
//! you named".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("no journal file given (pass --file or set $LEDGER_FILE)")]
    NoJournalFile,

    #[error(transparent)]
    Parse(#[from] gledger_parser::ParseError),

    #[error("invalid filter pattern {pattern:?}: {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("malformed date {0:?}: {1}")]
    Date(String, String),
}

pub type CliResult<T> = Result<T, CliError>;
