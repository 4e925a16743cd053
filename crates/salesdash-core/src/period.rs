//! Calendar month periods used to restrict queries by sale date

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One calendar month, covering `[start, end)` in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

impl MonthPeriod {
    /// Create a period, rejecting months outside 1-12 and unrepresentable years
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::invalid(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        let period = Self { year, month };
        // The following month must exist too, so December of the last year is out.
        if period.first_day().is_none() || period.first_day_of_next_month().is_none() {
            return Err(CoreError::invalid(format!("Year {} is out of range", year)));
        }
        Ok(period)
    }

    /// Parse raw query-string values
    pub fn parse(month: Option<&str>, year: Option<&str>) -> Result<Self, CoreError> {
        let (month, year) = match (month.map(str::trim), year.map(str::trim)) {
            (Some(m), Some(y)) if !m.is_empty() && !y.is_empty() => (m, y),
            _ => return Err(CoreError::invalid("Month and year are required.")),
        };
        let month: u32 = month
            .parse()
            .map_err(|_| CoreError::invalid(format!("Month must be a number, got '{}'", month)))?;
        let year: i32 = year
            .parse()
            .map_err(|_| CoreError::invalid(format!("Year must be a number, got '{}'", year)))?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn first_day_of_next_month(&self) -> Option<NaiveDate> {
        if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        }
    }

    /// First instant of the month (inclusive)
    pub fn start(&self) -> DateTime<Utc> {
        self.first_day()
            .unwrap_or(NaiveDate::MIN)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    /// First instant of the following month (exclusive)
    pub fn end(&self) -> DateTime<Utc> {
        self.first_day_of_next_month()
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }
}

impl std::fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
