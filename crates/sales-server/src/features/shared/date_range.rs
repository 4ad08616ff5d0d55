//! Report date ranges
//!
//! Revenue endpoints take optional `start_date` / `end_date` query parameters
//! in `YYYY-MM-DD`. A missing start defaults to one year before today and a
//! missing end defaults to today.

use chrono::{Months, NaiveDate, Utc};
use sales_common::{
    dates::{ensure_ordered, parse_date, DATE_FORMAT},
    SalesError,
};
use serde::{Deserialize, Serialize};

/// Raw date range query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Validated inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRangeParams {
    /// Resolve against the current UTC date
    pub fn resolve(&self) -> Result<DateRange, SalesError> {
        self.resolve_at(Utc::now().date_naive())
    }

    /// Resolve against an explicit `today`
    pub fn resolve_at(&self, today: NaiveDate) -> Result<DateRange, SalesError> {
        let start = match non_blank(&self.start_date) {
            Some(value) => parse_date(value)?,
            None => today.checked_sub_months(Months::new(12)).unwrap_or(today),
        };
        let end = match non_blank(&self.end_date) {
            Some(value) => parse_date(value)?,
            None => today,
        };

        ensure_ordered(start, end)?;

        Ok(DateRange { start, end })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl DateRange {
    /// Echo of the range for response metadata
    pub fn to_meta(&self) -> serde_json::Value {
        serde_json::json!({
            "start_date": self.start.format(DATE_FORMAT).to_string(),
            "end_date": self.end.format(DATE_FORMAT).to_string(),
        })
    }
}
