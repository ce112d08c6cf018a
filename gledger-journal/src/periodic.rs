use chrono::NaiveDate;

use crate::transaction::Transaction;

/// How often a [`PeriodicTransaction`] repeats.
///
/// `None` is not "no interval specified" in the usual sense — it
/// designates a budget allocation rather than a recurring transaction
/// (see the Journal/Budget component design).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interval {
    None,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Biweekly,
    Fortnightly,
    Bimonthly,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub interval: Interval,
    pub interval_frequency: u32,
}

/// A transaction template that either allocates a budget (`interval ==
/// Interval::None`) or, for any other interval, is expanded into
/// concrete [`Transaction`]s over a requested window.
///
/// Expansion for non-`None` intervals is an explicitly open question
/// (see the design notes): the source this was translated from stubs
/// it out and returns no transactions, so this implementation does the
/// same rather than guess at an enumeration rule.
pub struct PeriodicTransaction {
    pub transaction: Transaction,
    pub period: Period,
}

impl PeriodicTransaction {
    pub fn new(transaction: Transaction, period: Period) -> Self {
        PeriodicTransaction { transaction, period }
    }

    pub fn is_budget_allocation(&self) -> bool {
        self.period.interval == Interval::None
    }

    /// Expand this periodic transaction into concrete transactions
    /// falling within `[window_start, window_end]` (either bound `None`
    /// meaning unbounded). Returns an empty vector for any interval
    /// other than `None`, per the open question above; `None`-interval
    /// periodic transactions are never expanded here — they are routed
    /// directly to the budget as an allocation instead.
    pub fn expand(
        &self,
        _window_start: Option<NaiveDate>,
        _window_end: Option<NaiveDate>,
    ) -> Vec<Transaction> {
        Vec::new()
    }
}
