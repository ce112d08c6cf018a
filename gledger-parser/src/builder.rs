//! The transaction-builder state machine (§4.2, §4.3): consumes the
//! flat [`Item`] stream one token at a time, validates that each token
//! follows a legal predecessor, assembles postings, and closes a
//! transaction (or periodic transaction) once a blank line, EOF, or the
//! next header is seen.

use std::rc::Rc;
use std::cell::RefCell;

use gledger_journal::amount::IncompleteAmount;
use gledger_journal::periodic::{Interval, Period, PeriodicTransaction};
use gledger_journal::posting::Posting;
use gledger_journal::transaction::{State, Transaction, TransactionRef};
use gledger_journal::budget::TO_BE_BUDGETED;

use crate::date::parse_date;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Item, ItemKind};

/// A fully-formed transaction or periodic transaction, ready for the
/// driver to hand to its consumer.
pub enum BuiltItem {
    Transaction(TransactionRef),
    Periodic(PeriodicTransaction),
}

/// Which grammar a header line opened.
enum Mode {
    Normal,
    Periodic,
}

/// A posting assembled in progress, closed out once the next `Account`
/// token (or the transaction itself) arrives.
struct OpenPosting {
    account_path: String,
    commodity: Option<String>,
    quantity: Option<i64>,
    comments: Vec<String>,
}

impl OpenPosting {
    fn new(account_path: String) -> Self {
        OpenPosting { account_path, commodity: None, quantity: None, comments: Vec::new() }
    }

    fn into_parts(self) -> (String, IncompleteAmount, Vec<String>) {
        let amount = IncompleteAmount { quantity: self.quantity, commodity: self.commodity };
        (self.account_path, amount, self.comments)
    }
}

#[derive(Default)]
struct HeaderState {
    date: Option<chrono::NaiveDate>,
    state: State,
    payee: String,
    header_note: Option<String>,
    body_notes: Vec<String>,
    period: Option<Period>,
}

/// Parse a `~`-header's body into a [`Period`]: `<DATE> [INTERVAL[/FREQUENCY]]`,
/// where an omitted interval means `Interval::None` (a budget
/// allocation). `PERIOD_SPEC`'s exact grammar beyond the token boundary
/// is a design decision recorded in DESIGN.md rather than a literal
/// requirement.
fn parse_period_spec(spec: &str) -> ParseResult<Period> {
    let mut tokens = spec.split_whitespace();
    let date_tok = tokens.next().ok_or_else(|| ParseError::date(format!("{spec:?}: empty period spec")))?;
    let start_date = parse_date(date_tok)?;

    let (interval, interval_frequency) = match tokens.next() {
        None => (Interval::None, 1),
        Some(tok) => {
            let (name, freq) = match tok.split_once('/') {
                Some((n, f)) => (n, f.parse::<u32>().unwrap_or(1)),
                None => (tok, 1),
            };
            let interval = match name.to_ascii_lowercase().as_str() {
                "none" => Interval::None,
                "daily" => Interval::Daily,
                "weekly" => Interval::Weekly,
                "monthly" => Interval::Monthly,
                "quarterly" => Interval::Quarterly,
                "yearly" => Interval::Yearly,
                "biweekly" => Interval::Biweekly,
                "fortnightly" => Interval::Fortnightly,
                "bimonthly" => Interval::Bimonthly,
                _ => return Err(ParseError::date(format!("{tok:?}: unrecognized period interval"))),
            };
            (interval, freq)
        }
    };
    Ok(Period { start_date, end_date: None, interval, interval_frequency })
}

/// Drives the per-transaction grammar described in §4.2: validates
/// token order, assembles postings, and emits a [`BuiltItem`] each time
/// a blank line, EOF, or a fresh header closes the transaction
/// currently in progress.
pub struct TransactionBuilder {
    last_kind: Option<ItemKind>,
    mode: Option<Mode>,
    header: HeaderState,
    postings: Vec<(String, IncompleteAmount, Vec<String>)>,
    current_posting: Option<OpenPosting>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        TransactionBuilder {
            last_kind: None,
            mode: None,
            header: HeaderState::default(),
            postings: Vec::new(),
            current_posting: None,
        }
    }

    /// Feed one lexed token in. Returns `Some(item)` whenever this
    /// token's arrival closed out a previously in-progress transaction.
    pub fn feed(&mut self, item: Item) -> ParseResult<Option<BuiltItem>> {
        match item.kind {
            ItemKind::EmptyLine | ItemKind::Eof => self.close(),
            ItemKind::Include => Ok(None),
            ItemKind::Comment => {
                self.push_comment(item.text);
                Ok(None)
            }
            ItemKind::Date => {
                let flushed = self.close()?;
                self.header = HeaderState { date: Some(parse_date(&item.text)?), ..HeaderState::default() };
                self.mode = Some(Mode::Normal);
                self.last_kind = Some(ItemKind::Date);
                Ok(flushed)
            }
            ItemKind::Period => {
                let flushed = self.close()?;
                self.header = HeaderState { period: Some(parse_period_spec(&item.text)?), ..HeaderState::default() };
                self.mode = Some(Mode::Periodic);
                self.last_kind = Some(ItemKind::Period);
                Ok(flushed)
            }
            ItemKind::State => {
                self.validate(ItemKind::State, &[ItemKind::Date])?;
                self.header.state = item.text.chars().next().map(State::from).unwrap_or_default();
                self.last_kind = Some(ItemKind::State);
                Ok(None)
            }
            ItemKind::Payee => {
                self.validate(ItemKind::Payee, &[ItemKind::Date, ItemKind::State])?;
                self.header.payee = item.text;
                self.last_kind = Some(ItemKind::Payee);
                Ok(None)
            }
            ItemKind::Account => {
                self.validate(ItemKind::Account, &[ItemKind::Payee, ItemKind::Amount, ItemKind::Account, ItemKind::Period])?;
                self.close_current_posting();
                self.current_posting = Some(OpenPosting::new(item.text));
                self.last_kind = Some(ItemKind::Account);
                Ok(None)
            }
            ItemKind::Commodity => {
                self.validate(ItemKind::Commodity, &[ItemKind::Account])?;
                if let Some(posting) = self.current_posting.as_mut() {
                    posting.commodity = Some(item.text);
                }
                self.last_kind = Some(ItemKind::Commodity);
                Ok(None)
            }
            ItemKind::Amount => {
                self.validate(ItemKind::Amount, &[ItemKind::Commodity, ItemKind::Payee])?;
                let quantity = gledger_journal::amount::parse_amount_literal(&item.text)
                    .ok_or_else(|| ParseError::amount(item.text.clone()))?;
                if let Some(posting) = self.current_posting.as_mut() {
                    posting.quantity = Some(quantity);
                }
                self.last_kind = Some(ItemKind::Amount);
                Ok(None)
            }
        }
    }

    fn validate(&self, kind: ItemKind, allowed: &[ItemKind]) -> ParseResult<()> {
        match self.last_kind {
            Some(last) if allowed.contains(&last) => Ok(()),
            Some(last) => Err(ParseError::builder_state(format!("{allowed:?}"), format!("{kind:?} after {last:?}"))),
            None => Err(ParseError::builder_state(format!("{allowed:?}"), format!("{kind:?} at start of input"))),
        }
    }

    fn push_comment(&mut self, text: String) {
        if let Some(posting) = self.current_posting.as_mut() {
            posting.comments.push(text);
        } else if self.postings.is_empty() {
            self.header.header_note = Some(text);
        } else {
            self.header.body_notes.push(text);
        }
    }

    fn close_current_posting(&mut self) {
        if let Some(posting) = self.current_posting.take() {
            self.postings.push(posting.into_parts());
        }
    }

    fn close(&mut self) -> ParseResult<Option<BuiltItem>> {
        self.close_current_posting();
        let mode = match self.mode.take() {
            Some(mode) => mode,
            None => return Ok(None),
        };
        let postings = std::mem::take(&mut self.postings);
        let header = std::mem::take(&mut self.header);
        self.last_kind = None;

        match mode {
            Mode::Normal => {
                let date = header.date.expect("a Normal transaction always has a Date token");
                let transaction = Transaction::new(date, header.state, header.payee);
                let transaction_ref: TransactionRef = Rc::new(RefCell::new(transaction));
                transaction_ref.borrow_mut().header_note = header.header_note;
                transaction_ref.borrow_mut().body_notes = header.body_notes;
                for (path, amount, comments) in postings {
                    let posting = Posting::new(path, amount.into_amount(None));
                    posting.borrow_mut().comments = comments;
                    Transaction::push_posting(&transaction_ref, posting);
                }
                let linked_postings = transaction_ref.borrow().postings.clone();
                Transaction::balance(&linked_postings)?;
                Ok(Some(BuiltItem::Transaction(transaction_ref)))
            }
            Mode::Periodic => {
                let period = header.period.expect("a Periodic transaction always has a Period token");
                let mut postings = postings;
                if period.interval == Interval::None {
                    add_implicit_to_be_budgeted(&mut postings);
                }

                let mut transaction = Transaction::new(period.start_date, header.state, header.payee);
                transaction.header_note = header.header_note;
                transaction.body_notes = header.body_notes;
                for (path, amount, comments) in postings {
                    let posting = Posting::new(path, amount.into_amount(None));
                    posting.borrow_mut().comments = comments;
                    transaction.push_posting_detached(posting);
                }
                Transaction::balance(&transaction.postings)?;
                Ok(Some(BuiltItem::Periodic(PeriodicTransaction::new(transaction, period))))
            }
        }
    }
}

/// A `None`-interval periodic transaction with no elided posting gets
/// an implicit `To Be Budgeted` counter-posting if its explicit
/// postings don't already sum to zero (§4.6, §9): unlike an ordinary
/// transaction, a budget allocation line like `~ 2020-10-01 Monthly\n
/// \tFood  20000` doesn't name its own source account.
fn add_implicit_to_be_budgeted(postings: &mut Vec<(String, IncompleteAmount, Vec<String>)>) {
    if postings.iter().any(|(_, amount, _)| amount.quantity.is_none()) {
        return;
    }
    let mut sum = 0i64;
    let mut last_commodity = String::new();
    for (_, amount, _) in postings.iter() {
        if let Some(q) = amount.quantity {
            sum += q;
        }
        if let Some(c) = &amount.commodity {
            if !c.is_empty() {
                last_commodity = c.clone();
            }
        }
    }
    if sum != 0 {
        postings.push((
            TO_BE_BUDGETED.to_string(),
            IncompleteAmount { quantity: Some(-sum), commodity: Some(last_commodity) },
            Vec::new(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::lexer::{Item, ItemKind};

    fn feed_all(builder: &mut TransactionBuilder, items: Vec<Item>) -> Vec<BuiltItem> {
        items.into_iter().filter_map(|item| builder.feed(item).unwrap()).collect()
    }

    #[test]
    fn assembles_a_simple_balanced_transaction() {
        let mut builder = TransactionBuilder::new();
        let built = feed_all(
            &mut builder,
            vec![
                Item::new(ItemKind::Date, "2020-10-11"),
                Item::new(ItemKind::State, "*"),
                Item::new(ItemKind::Payee, "A shop"),
                Item::new(ItemKind::Account, "Expenses:Food"),
                Item::new(ItemKind::Commodity, "GBP "),
                Item::new(ItemKind::Amount, "42.81"),
                Item::new(ItemKind::Account, "Assets:Current"),
                Item::new(ItemKind::Eof, ""),
            ],
        );
        assert_eq!(built.len(), 1);
        let BuiltItem::Transaction(t) = &built[0] else { panic!("expected a Transaction") };
        let t = t.borrow();
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2020, 10, 11).unwrap());
        assert_eq!(t.payee, "A shop");
        assert_eq!(t.postings.len(), 2);
        let elided = t.postings[1].borrow().amount.clone().unwrap();
        assert_eq!(elided.quantity, -4281);
        assert_eq!(elided.commodity, "GBP ");
    }

    #[test]
    fn rejects_multiple_elided_postings() {
        let mut builder = TransactionBuilder::new();
        let err = feed_all(
            &mut builder,
            vec![
                Item::new(ItemKind::Date, "2020-10-11"),
                Item::new(ItemKind::Payee, "A shop"),
                Item::new(ItemKind::Account, "Expenses:Food"),
                Item::new(ItemKind::Account, "Assets:Current"),
            ],
        );
        assert!(err.is_empty());
        assert!(builder.feed(Item::new(ItemKind::Eof, "")).is_err());
    }

    #[test]
    fn rejects_an_amount_with_no_preceding_account() {
        let mut builder = TransactionBuilder::new();
        builder.feed(Item::new(ItemKind::Date, "2020-10-11")).unwrap();
        builder.feed(Item::new(ItemKind::Payee, "A shop")).unwrap();
        assert!(builder.feed(Item::new(ItemKind::Commodity, "GBP")).is_err());
    }

    #[test]
    fn budget_allocation_gets_an_implicit_to_be_budgeted_posting() {
        let mut builder = TransactionBuilder::new();
        let built = feed_all(
            &mut builder,
            vec![
                Item::new(ItemKind::Period, "2020-10-01 Monthly"),
                Item::new(ItemKind::Account, "Food"),
                Item::new(ItemKind::Commodity, "GBP "),
                Item::new(ItemKind::Amount, "200.00"),
                Item::new(ItemKind::Eof, ""),
            ],
        );
        assert_eq!(built.len(), 1);
        let BuiltItem::Periodic(pt) = &built[0] else { panic!("expected a Periodic") };
        assert!(pt.is_budget_allocation());
        assert_eq!(pt.transaction.postings.len(), 2);
        let counter = pt.transaction.postings[1].borrow();
        assert_eq!(counter.account_path, "To Be Budgeted");
        assert_eq!(counter.amount.clone().unwrap().quantity, -20000);
    }

    #[test]
    fn trailing_comment_on_header_becomes_the_header_note() {
        let mut builder = TransactionBuilder::new();
        let built = feed_all(
            &mut builder,
            vec![
                Item::new(ItemKind::Date, "2020-10-11"),
                Item::new(ItemKind::Payee, "A shop"),
                Item::new(ItemKind::Comment, "a header note"),
                Item::new(ItemKind::Account, "Expenses:Food"),
                Item::new(ItemKind::Amount, "10.00"),
                Item::new(ItemKind::Account, "Assets:Current"),
                Item::new(ItemKind::Eof, ""),
            ],
        );
        let BuiltItem::Transaction(t) = &built[0] else { panic!("expected a Transaction") };
        assert_eq!(t.borrow().header_note.as_deref(), Some("a header note"));
    }
}
