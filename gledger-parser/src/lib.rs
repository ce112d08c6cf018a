//! Reads Ledger-compatible journal source and hands completed
//! transactions to a caller-supplied handler.
//!
//! This crate owns everything between a byte stream and a closed,
//! balanced [`gledger_journal::Transaction`]: the line-oriented
//! [`lexer::Lexer`], the per-transaction [`builder::TransactionBuilder`]
//! state machine, strict/smart date parsing, and the include-aware
//! [`parser::Parser`] driver that stitches included files into one
//! logical token stream. It never touches the account tree or budget
//! projection — that's `gledger-journal`'s job, and `gledger`'s CLI
//! wires the two together.

pub mod builder;
pub mod date;
pub mod error;
pub mod lexer;
pub mod parser;

pub use builder::{BuiltItem, TransactionBuilder};
pub use date::{parse_date, parse_smart_date};
pub use error::{ParseError, ParseResult};
pub use lexer::{Item, ItemKind, Lexer};
pub use parser::{Parser, TransactionHandler};
