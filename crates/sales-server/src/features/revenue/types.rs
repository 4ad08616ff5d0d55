//! Revenue result types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Revenue of all line items in a date range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalRevenue {
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRevenue {
    pub product_id: String,
    pub name: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegionRevenue {
    pub region: String,
    pub revenue: f64,
}

/// Revenue for one calendar bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PeriodRevenue {
    /// `YYYY-MM`, `YYYY-Qn` or `YYYY` depending on the interval
    pub period: String,
    /// First day of the bucket
    pub period_start: NaiveDate,
    pub revenue: f64,
}

/// Grouped revenue, tagged with the grouping that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum RevenueBreakdown {
    ByProduct(Vec<ProductRevenue>),
    ByCategory(Vec<CategoryRevenue>),
    ByRegion(Vec<RegionRevenue>),
    OverTime(Vec<PeriodRevenue>),
}

impl RevenueBreakdown {
    pub fn len(&self) -> usize {
        match self {
            Self::ByProduct(rows) => rows.len(),
            Self::ByCategory(rows) => rows.len(),
            Self::ByRegion(rows) => rows.len(),
            Self::OverTime(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Calendar bucket size for revenue over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// `DATE_TRUNC` field name
    pub(crate) fn trunc_unit(&self) -> &'static str {
        match self {
            Self::Monthly => "month",
            Self::Quarterly => "quarter",
            Self::Yearly => "year",
        }
    }

    /// `TO_CHAR` pattern for the period label
    pub(crate) fn label_format(&self) -> &'static str {
        match self {
            Self::Monthly => "YYYY-MM",
            Self::Quarterly => "YYYY-\"Q\"Q",
            Self::Yearly => "YYYY",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid interval '{0}': expected monthly, quarterly or yearly")]
pub struct InvalidInterval(pub String);

impl FromStr for Interval {
    type Err = InvalidInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(InvalidInterval(other.to_string())),
        }
    }
}
