//! Calendar date parsing
//!
//! Sale dates and report ranges use one fixed layout: a 4-digit year, a 2-digit
//! month and a 2-digit day separated by dashes. `chrono`'s `%Y-%m-%d` also accepts
//! single-digit months/days and signed years, so the shape is checked first.

use chrono::NaiveDate;

use crate::error::{Result, SalesError};

/// Layout of every date accepted or emitted by the system
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    if !has_date_shape(value) {
        return Err(SalesError::InvalidDate {
            value: value.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| SalesError::InvalidDate {
        value: value.to_string(),
    })
}

fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Validate an inclusive date range
pub fn ensure_ordered(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(SalesError::InvalidDateRange {
            start: start.format(DATE_FORMAT).to_string(),
            end: end.format(DATE_FORMAT).to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_date() {
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_rejects_loose_layouts() {
        for value in ["2024-1-05", "24-01-05", "2024/01/05", "+2024-01-05", "2024-01-05 ", ""] {
            assert!(parse_date(value).is_err(), "{value:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_ensure_ordered() {
        let jan = parse_date("2024-01-01").unwrap();
        let feb = parse_date("2024-02-01").unwrap();

        assert!(ensure_ordered(jan, feb).is_ok());
        assert!(ensure_ordered(jan, jan).is_ok());

        let err = ensure_ordered(feb, jan).unwrap_err();
        assert!(err.to_string().contains("2024-02-01"));
    }
}
