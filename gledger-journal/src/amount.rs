use std::fmt;
use std::ops::{Add, Neg, Sub};

use typed_builder::TypedBuilder;

/// A quantity of a commodity, represented as a fixed-point integer.
///
/// `quantity` is the amount in hundredths of the commodity's base unit
/// (i.e. cents, for currencies with two decimal places). Fixed-point
/// arithmetic is used throughout so that repeated addition of postings
/// never accumulates floating-point drift.
#[derive(Clone, Debug, Eq, PartialEq, Hash, TypedBuilder)]
pub struct Amount {
    /// Quantity in hundredths of the commodity's unit.
    pub quantity: i64,

    /// The commodity this amount is denominated in, e.g. `"USD"`.
    pub commodity: String,
}

impl Amount {
    pub fn zero(commodity: impl Into<String>) -> Self {
        Amount {
            quantity: 0,
            commodity: commodity.into(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.quantity == 0
    }

    /// Negate this amount's quantity, keeping its commodity.
    pub fn negated(&self) -> Self {
        Amount {
            quantity: -self.quantity,
            commodity: self.commodity.clone(),
        }
    }

    /// Add `other` to `self`, following the cross-commodity policy in
    /// §9: differing commodities are not prevented here (that check is
    /// the caller's business when balancing a transaction); the
    /// quantity is simply summed.
    pub fn add_quantity(&self, other: &Amount) -> Amount {
        Amount {
            quantity: self.quantity + other.quantity,
            commodity: self.commodity.clone(),
        }
    }
}

impl Neg for Amount {
    type Output = Amount;
    fn neg(self) -> Amount {
        Amount {
            quantity: -self.quantity,
            commodity: self.commodity,
        }
    }
}

impl Add for Amount {
    type Output = Amount;
    fn add(self, rhs: Amount) -> Amount {
        Amount {
            quantity: self.quantity + rhs.quantity,
            commodity: self.commodity,
        }
    }
}

impl Sub for Amount {
    type Output = Amount;
    fn sub(self, rhs: Amount) -> Amount {
        Amount {
            quantity: self.quantity - rhs.quantity,
            commodity: self.commodity,
        }
    }
}

impl Amount {
    /// Render the signed, two-decimal-place quantity, optionally
    /// prefixed by the commodity (concatenated immediately before the
    /// sign, per the rendering contract in §3/§6 — a commodity that
    /// carries its own trailing space, e.g. `"GBP "`, supplies the gap).
    pub fn displayable_quantity(&self, with_commodity: bool) -> String {
        let sign = if self.quantity < 0 { "-" } else { "" };
        let abs = self.quantity.unsigned_abs();
        if with_commodity {
            format!("{}{}{}.{:02}", self.commodity, sign, abs / 100, abs % 100)
        } else {
            format!("{}{}.{:02}", sign, abs / 100, abs % 100)
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.displayable_quantity(true))
    }
}

/// An amount that may be missing its quantity and/or commodity, as seen
/// while a posting line is still being lexed (before elision is
/// resolved against the rest of the transaction).
#[derive(Clone, Debug, Eq, PartialEq, Default, TypedBuilder)]
pub struct IncompleteAmount {
    #[builder(default)]
    pub quantity: Option<i64>,

    #[builder(default)]
    pub commodity: Option<String>,
}

impl IncompleteAmount {
    pub fn is_elided(&self) -> bool {
        self.quantity.is_none()
    }

    pub fn into_amount(self, inherited_commodity: Option<&str>) -> Option<Amount> {
        let quantity = self.quantity?;
        let commodity = self
            .commodity
            .or_else(|| inherited_commodity.map(str::to_owned))
            .unwrap_or_default();
        Some(Amount { quantity, commodity })
    }
}

impl From<Amount> for IncompleteAmount {
    fn from(a: Amount) -> Self {
        IncompleteAmount {
            quantity: Some(a.quantity),
            commodity: Some(a.commodity),
        }
    }
}

/// Parse an amount literal of the form `[sign] digits['.' digits]`.
///
/// The stored quantity is `sign * (integer * 100 + fractional)`, where
/// `fractional` is the fractional digit string parsed as a plain
/// integer — not padded or truncated to two digits. `"1.5"` and
/// `"1.50"` are therefore deliberately different quantities (105 vs
/// 150), matching the formula literally.
pub fn parse_amount_literal(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, s.strip_prefix('+').unwrap_or(s)),
    };
    if rest.is_empty() {
        return None;
    }
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rest, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let integer: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    if !frac_part.is_empty() && !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let fractional: i64 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().ok()?
    };
    Some(sign * (integer * 100 + fractional))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_amounts() {
        assert_eq!(parse_amount_literal("100"), Some(10000));
        assert_eq!(parse_amount_literal("-100"), Some(-10000));
    }

    #[test]
    fn parses_fractional_amounts() {
        assert_eq!(parse_amount_literal("12.34"), Some(1234));
        assert_eq!(parse_amount_literal("-12.34"), Some(-1234));
    }

    #[test]
    fn fractional_digit_string_is_not_padded_or_truncated() {
        // sign * (integer * 100 + fractional): the fractional digit
        // string is parsed as a plain integer, so a shorter or longer
        // fraction changes the result rather than being normalized to
        // two digits.
        assert_eq!(parse_amount_literal("1.5"), Some(105));
        assert_eq!(parse_amount_literal("1.50"), Some(150));
        assert_eq!(parse_amount_literal("12.3"), Some(1203));
        assert_eq!(parse_amount_literal("12.345"), Some(1545));
    }

    #[test]
    fn rejects_thousands_separators() {
        assert_eq!(parse_amount_literal("1,000"), None);
    }

    #[test]
    fn renders_commodity_immediately_before_the_signed_number() {
        let a = Amount::builder().quantity(4281).commodity("GBP ".into()).build();
        assert_eq!(a.displayable_quantity(true), "GBP 42.81");

        let b = Amount::builder().quantity(-4281).commodity("£".into()).build();
        assert_eq!(b.displayable_quantity(true), "£-42.81");

        let c = Amount::builder().quantity(9).commodity("GBP ".into()).build();
        assert_eq!(c.displayable_quantity(true), "GBP 0.09");
    }

    #[test]
    fn renders_without_commodity_on_request() {
        let a = Amount::builder().quantity(-50).commodity("USD".into()).build();
        assert_eq!(a.displayable_quantity(false), "-0.50");
    }
}
