//! Strict and "smart" date parsing (§4.3). A transaction header's date
//! field is always strict (`YYYY-MM-DD`, or `.`/`/` in place of `-`);
//! the looser smart-date grammar is for CLI-supplied `--begin`/`--end`
//! windows, where a bare year or `MM-DD` is convenient shorthand.

use chrono::{Datelike, NaiveDate};

use crate::error::{ParseError, ParseResult};

const SEPARATORS: [char; 3] = ['-', '.', '/'];

fn find_separator(s: &str) -> Option<char> {
    SEPARATORS.iter().find(|&&c| s.contains(c)).copied()
}

/// Parse a strict `YYYY<sep>MM<sep>DD` date, where `<sep>` is one of
/// `-`, `.`, or `/`, used consistently.
pub fn parse_date(s: &str) -> ParseResult<NaiveDate> {
    let sep = find_separator(s).ok_or_else(|| ParseError::date(format!("{s:?}: no recognized date separator")))?;
    let parts: Vec<&str> = s.split(sep).collect();
    let [y, m, d] = parts.as_slice() else {
        return Err(ParseError::date(format!("{s:?}: expected YYYY-MM-DD")));
    };
    if y.len() != 4 || m.len() != 2 || d.len() != 2 {
        return Err(ParseError::date(format!("{s:?}: expected a 4-digit year and 2-digit month/day")));
    }
    let year: i32 = y.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid year")))?;
    let month: u32 = m.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid month")))?;
    let day: u32 = d.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid day")))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ParseError::date(format!("{s:?}: out-of-range date")))
}

/// Parse a "smart" date: a bare 4-digit year (`YYYY`, defaulting to
/// January 1st), a year-month (`YYYY-MM`, defaulting to the 1st), a
/// month-day relative to `today`'s year (`MM-DD`), or a full strict
/// date.
pub fn parse_smart_date(s: &str, today: NaiveDate) -> ParseResult<NaiveDate> {
    let Some(sep) = find_separator(s) else {
        if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            let year: i32 = s.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid year")))?;
            return NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| ParseError::date(format!("{s:?}: out-of-range year")));
        }
        return Err(ParseError::date(format!("{s:?}: not a recognized date")));
    };

    let parts: Vec<&str> = s.split(sep).collect();
    match parts.as_slice() {
        [y, m] if y.len() == 4 => {
            let year: i32 = y.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid year")))?;
            let month: u32 = m.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid month")))?;
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| ParseError::date(format!("{s:?}: out-of-range date")))
        }
        [m, d] if m.len() == 2 && d.len() == 2 => {
            let month: u32 = m.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid month")))?;
            let day: u32 = d.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid day")))?;
            NaiveDate::from_ymd_opt(today.year(), month, day)
                .ok_or_else(|| ParseError::date(format!("{s:?}: out-of-range date")))
        }
        [y, m, d] => {
            let year: i32 = y.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid year")))?;
            let month: u32 = m.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid month")))?;
            let day: u32 = d.parse().map_err(|_| ParseError::date(format!("{s:?}: invalid day")))?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ParseError::date(format!("{s:?}: out-of-range date")))
        }
        _ => Err(ParseError::date(format!("{s:?}: not a recognized date"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_strict_dates_with_any_of_the_three_separators() {
        assert_eq!(parse_date("2020-10-11").unwrap(), date(2020, 10, 11));
        assert_eq!(parse_date("2020.10.11").unwrap(), date(2020, 10, 11));
        assert_eq!(parse_date("2020/10/11").unwrap(), date(2020, 10, 11));
    }

    #[test]
    fn rejects_out_of_range_dates() {
        assert!(parse_date("2020-02-30").is_err());
    }

    #[test]
    fn smart_dates_cover_year_year_month_and_month_day() {
        let today = date(2020, 1, 1);
        assert_eq!(parse_smart_date("2020", today).unwrap(), date(2020, 1, 1));
        assert_eq!(parse_smart_date("2020/06", today).unwrap(), date(2020, 6, 1));
        assert_eq!(parse_smart_date("06/22", today).unwrap(), date(2020, 6, 22));
        assert_eq!(parse_smart_date("2020-10-11", today).unwrap(), date(2020, 10, 11));
    }

    #[test]
    fn smart_dates_reject_malformed_input() {
        let today = date(2020, 1, 1);
        assert!(parse_smart_date("13/06", today).is_err());
        assert!(parse_smart_date("20", today).is_err());
    }
}
