//! Contribution period and calendar arithmetic.
//!
//! Monthly and yearly steps use chrono's month addition, which keeps the
//! day-of-month and clamps to the last day of shorter months (Jan 31 -> Feb 29
//! in a leap year, Feb 29 + 1 year -> Feb 28).

use crate::domain::error::AipError;
use chrono::{Days, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestPeriod {
    Weekly,
    Monthly,
    Days(u32),
}

impl InvestPeriod {
    /// Next nominal contribution date.
    pub fn advance(self, date: NaiveDate) -> Result<NaiveDate, AipError> {
        let next = match self {
            InvestPeriod::Weekly => date.checked_add_days(Days::new(7)),
            InvestPeriod::Monthly => date.checked_add_months(Months::new(1)),
            InvestPeriod::Days(n) => date.checked_add_days(Days::new(u64::from(n))),
        };
        next.ok_or_else(|| out_of_range(date))
    }
}

impl FromStr for InvestPeriod {
    type Err = AipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "weekly" => Ok(InvestPeriod::Weekly),
            "monthly" => Ok(InvestPeriod::Monthly),
            other => match other.parse::<u32>() {
                Ok(n) if n > 0 => Ok(InvestPeriod::Days(n)),
                _ => Err(AipError::InvalidConfiguration {
                    reason: format!(
                        "unknown inv_period '{s}' (expected weekly, monthly or a positive number of days)"
                    ),
                }),
            },
        }
    }
}

impl fmt::Display for InvestPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestPeriod::Weekly => write!(f, "weekly"),
            InvestPeriod::Monthly => write!(f, "monthly"),
            InvestPeriod::Days(n) => write!(f, "{n}"),
        }
    }
}

/// `start` plus a whole number of calendar years.
pub fn add_years(start: NaiveDate, years: u32) -> Result<NaiveDate, AipError> {
    years
        .checked_mul(12)
        .and_then(|months| start.checked_add_months(Months::new(months)))
        .ok_or_else(|| out_of_range(start))
}

fn out_of_range(date: NaiveDate) -> AipError {
    AipError::InvalidConfiguration {
        reason: format!("date arithmetic overflow from {date}"),
    }
}
