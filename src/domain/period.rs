use crate::error::PaymentError;
use chrono::{DateTime, Datelike, TimeZone};
use std::fmt;
use std::str::FromStr;

/// A calendar month without a day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, PaymentError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(PaymentError::InvalidYearMonth(format!(
                "month must be between 1 and 12, got {month}"
            )))
        }
    }

    /// The month a timestamp falls in, read from its own local components.
    pub fn of<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> bool {
        Self::of(date) == *self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaymentError::InvalidYearMonth(format!("expected YYYY-MM, got '{s}'"));

        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}
