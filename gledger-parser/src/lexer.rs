//! Line-oriented scanner (§4.1): turns a byte stream into a flat
//! sequence of [`Item`]s, one line at a time, the way
//! `ledger-rs-prototype`'s `parser2.rs` walks a `BufReader` rather than
//! handing the whole file to a grammar.

use std::io::BufRead;

use crate::error::{ParseError, ParseResult};

/// The kind of token a lexed line (or line fragment) produced.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ItemKind {
    EmptyLine,
    Include,
    Date,
    State,
    Payee,
    Account,
    Commodity,
    Amount,
    Period,
    Comment,
    Eof,
}

/// A single lexed token: its kind plus whatever text it carries
/// (empty for `EmptyLine`/`Eof`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub text: String,
}

impl Item {
    pub fn new(kind: ItemKind, text: impl Into<String>) -> Item {
        Item { kind, text: text.into() }
    }
}

fn split_on_comment(s: &str) -> (&str, Option<&str>) {
    match s.find([';', '#']) {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    }
}

/// Find the byte offset where a posting's account field ends: the
/// first tab, or the first of two consecutive spaces. Neither found
/// means the whole line is the account name (no amount present).
fn split_account(s: &str) -> (&str, &str) {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\t' {
            return (&s[..i], &s[i..]);
        }
        if bytes[i] == b' ' && i + 1 < bytes.len() && bytes[i + 1] == b' ' {
            return (&s[..i], &s[i..]);
        }
        i += 1;
    }
    (s, "")
}

/// Scans a single file's worth of lines into [`Item`]s. The
/// multi-file `include` stitching lives one layer up, in
/// [`crate::parser::Parser`] — a `Lexer` only ever knows about the
/// reader it was given.
pub struct Lexer<R> {
    reader: R,
    pub line_no: usize,
    pending: Vec<Item>,
    eof_emitted: bool,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Lexer { reader, line_no: 0, pending: Vec::new(), eof_emitted: false }
    }

    /// Pull the next token, reading and classifying lines until one
    /// yields at least one token (a bare top-level comment line yields
    /// none, and is skipped transparently rather than surfaced as an
    /// `EmptyLine`).
    pub fn next_item(&mut self) -> ParseResult<Item> {
        loop {
            if !self.pending.is_empty() {
                return Ok(self.pending.remove(0));
            }
            if self.eof_emitted {
                return Ok(Item::new(ItemKind::Eof, ""));
            }

            let mut raw = String::new();
            let n = self.reader.read_line(&mut raw).map_err(ParseError::io)?;
            if n == 0 {
                self.eof_emitted = true;
                return Ok(Item::new(ItemKind::Eof, ""));
            }
            self.line_no += 1;
            let line = raw.trim_end_matches(['\n', '\r']).to_string();
            self.lex_line(&line)?;
        }
    }

    fn push(&mut self, kind: ItemKind, text: impl Into<String>) {
        self.pending.push(Item::new(kind, text));
    }

    fn lex_line(&mut self, line: &str) -> ParseResult<()> {
        if line.is_empty() {
            self.push(ItemKind::EmptyLine, "");
            return Ok(());
        }

        let first = line.chars().next().unwrap();
        match first {
            ';' | '#' => {} // top-level comment, dropped entirely: no token
            'i' => self.lex_include(line)?,
            '~' => self.lex_period(line)?,
            c if c.is_ascii_digit() => self.lex_transaction_header(line)?,
            ' ' | '\t' => self.lex_posting(line)?,
            _ => {
                return Err(ParseError::lex(format!("malformed line: {:?}", line)));
            }
        }
        Ok(())
    }

    fn lex_include(&mut self, line: &str) -> ParseResult<()> {
        let rest = match line.strip_prefix("include") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest,
            _ => return Err(ParseError::lex(format!("malformed line: {:?}", line))),
        };
        let (path, _comment) = split_on_comment(rest.trim_start());
        self.push(ItemKind::Include, path.trim());
        Ok(())
    }

    fn lex_period(&mut self, line: &str) -> ParseResult<()> {
        let rest = line.strip_prefix('~').unwrap_or(line).trim_start();
        let (spec, _comment) = split_on_comment(rest);
        self.push(ItemKind::Period, spec.trim());
        Ok(())
    }

    fn lex_transaction_header(&mut self, line: &str) -> ParseResult<()> {
        let date_end = line.find(' ').unwrap_or(line.len());
        let (date, mut rest) = (&line[..date_end], line[date_end..].trim_start());
        self.push(ItemKind::Date, date);

        if let Some(c) = rest.chars().next() {
            if c == '!' || c == '*' {
                self.push(ItemKind::State, c.to_string());
                rest = rest[1..].trim_start();
            }
        }

        let (payee, comment) = split_on_comment(rest);
        self.push(ItemKind::Payee, payee.trim());
        if let Some(comment) = comment {
            self.push(ItemKind::Comment, comment.trim());
        }
        Ok(())
    }

    fn lex_posting(&mut self, line: &str) -> ParseResult<()> {
        let rest = if let Some(rest) = line.strip_prefix('\t') {
            rest
        } else if let Some(rest) = line.strip_prefix("  ") {
            rest.trim_start_matches(' ')
        } else {
            return Err(ParseError::lex(
                "posting line must be indented with a tab or at least two spaces".to_string(),
            ));
        };

        if rest.is_empty() {
            self.push(ItemKind::EmptyLine, "");
            return Ok(());
        }

        let first = rest.chars().next().unwrap();
        if first == ';' || first == '#' {
            self.push(ItemKind::Comment, rest[1..].trim());
            return Ok(());
        }

        let (account, remainder) = split_account(rest);
        self.push(ItemKind::Account, account.trim_end_matches(' '));

        let remainder = remainder.trim_start_matches('\t').trim_start_matches(' ');
        if remainder.is_empty() {
            return Ok(());
        }

        // Stop only at a digit or sign, not whitespace: a named commodity's
        // separating space (e.g. "GBP " before "42.81") belongs to the
        // commodity text itself, so it renders back out the same way
        // (Amount::displayable_quantity concatenates commodity and number
        // with no space of its own).
        let commodity_end = remainder
            .find(|c: char| c.is_ascii_digit() || c == '+' || c == '-')
            .unwrap_or(remainder.len());
        let (commodity, amount_part) = remainder.split_at(commodity_end);
        self.push(ItemKind::Commodity, commodity);

        let (amount, comment) = split_on_comment(amount_part);
        let amount = amount.trim();
        if !amount.is_empty() {
            self.push(ItemKind::Amount, amount);
        }
        if let Some(comment) = comment {
            self.push(ItemKind::Comment, comment.trim());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn lex_all(input: &str) -> Vec<Item> {
        let mut lexer = Lexer::new(Cursor::new(input.as_bytes()));
        let mut items = Vec::new();
        loop {
            let item = lexer.next_item().unwrap();
            let is_eof = item.kind == ItemKind::Eof;
            items.push(item);
            if is_eof {
                break;
            }
        }
        items
    }

    #[test]
    fn lexes_a_simple_transaction() {
        let items = lex_all("2020-10-11 * A shop\n\tExpenses:Food  GBP 42.81\n\tAssets:Current\n");
        assert_eq!(
            items,
            vec![
                Item::new(ItemKind::Date, "2020-10-11"),
                Item::new(ItemKind::State, "*"),
                Item::new(ItemKind::Payee, "A shop"),
                Item::new(ItemKind::Account, "Expenses:Food"),
                Item::new(ItemKind::Commodity, "GBP "),
                Item::new(ItemKind::Amount, "42.81"),
                Item::new(ItemKind::Account, "Assets:Current"),
                Item::new(ItemKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn top_level_comment_lines_produce_no_token() {
        let items = lex_all("; a whole-line comment\n2020-10-11 A shop\n");
        assert_eq!(items[0], Item::new(ItemKind::Date, "2020-10-11"));
    }

    #[test]
    fn indented_comment_line_is_preserved_as_a_comment_token() {
        let items = lex_all("2020-10-11 A shop\n\t; a note on its own line\n\tAssets:Cash\n");
        assert_eq!(items[1], Item::new(ItemKind::Comment, "a note on its own line"));
    }

    #[test]
    fn posting_with_no_separator_has_no_amount_token() {
        let items = lex_all("2020-10-11 A shop\n\tExpenses:Food with a space\n\tAssets:Cash\n");
        assert_eq!(items[1], Item::new(ItemKind::Account, "Expenses:Food with a space"));
    }

    #[test]
    fn include_line_captures_the_path() {
        let items = lex_all("include accounts.ledger\n");
        assert_eq!(items[0], Item::new(ItemKind::Include, "accounts.ledger"));
    }

    #[test]
    fn rejects_a_line_with_an_unrecognized_leading_character() {
        let mut lexer = Lexer::new(Cursor::new(b"!!! garbage\n".as_slice()));
        assert!(lexer.next_item().is_err());
    }
}
