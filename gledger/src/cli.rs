//! The CLI surface (spec.md §6), collected into a `clap::Parser`/
//! `clap::Subcommand` derive tree rather than read back out of process
//! globals — the `ProcessingConfig` design note (§9) applies just as
//! much to the CLI's own flags as it does to the journal's. Grounded in
//! `rustledger`'s `bean-doctor` CLI
//! (`other_examples/38cc7410_..._cmd-doctor.rs.rs`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gledger", version, about = "gledger - command line double-entry bookkeeping with envelope budgeting", long_about = None)]
pub struct Cli {
    /// Journal file to read (defaults to $LEDGER_FILE)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Only consider transactions on or after this date (smart date: YYYY, YYYY-MM, MM-DD, or YYYY-MM-DD)
    #[arg(long, global = true)]
    pub begin: Option<String>,

    /// Only consider transactions on or before this date (smart date)
    #[arg(long, global = true)]
    pub end: Option<String>,

    /// Restrict to transactions within the current calendar month
    #[arg(long, global = true)]
    pub current: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shows accounts and their balances
    #[command(alias = "bal")]
    Balance {
        /// Show accounts as a flat, colon-delimited list
        #[arg(long)]
        flatten: bool,
        /// Show accounts with a zero balance
        #[arg(long)]
        show_zero: bool,
        /// Show the envelope-budget remaining column alongside each account
        #[arg(long)]
        show_budget: bool,
        /// Collapse single-child accounts into one line
        #[arg(long)]
        collapse: bool,
        /// Account/payee/note filters (sigil: `@payee`, `=note`, bare account name)
        filters: Vec<String>,
    },

    /// Shows envelope/expense budget accounts and their balances
    #[command(alias = "bud")]
    Budget {
        /// Show accounts as a flat, colon-delimited list
        #[arg(long)]
        flatten: bool,
        /// Show accounts with a zero balance
        #[arg(long)]
        show_zero: bool,
        /// Collapse single-child accounts into one line
        #[arg(long)]
        collapse: bool,
        /// Account/payee/note filters
        filters: Vec<String>,
    },

    /// Shows transaction entries, sorted by date
    #[command(alias = "p")]
    Print {
        /// Account/payee/note filters
        filters: Vec<String>,
    },

    /// Lists unique account paths
    #[command(alias = "acc")]
    Accounts {
        /// Account/payee/note filters
        filters: Vec<String>,
    },

    /// Lists unique payees
    #[command(alias = "pay")]
    Payees {
        /// Account/payee/note filters
        filters: Vec<String>,
    },

    /// Shows file, date-range, count, and age-of-money statistics
    #[command(alias = "stats")]
    Statistics,
}
