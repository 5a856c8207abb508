use super::payment::Payment;
use super::period::YearMonth;
use crate::error::Result;
use chrono::{DateTime, FixedOffset};

/// Bulk, read-only provider of payment records.
pub trait PaymentSource: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<Payment>>;
}

/// Provider of the current moment.
pub trait ClockSource: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    fn current_year_month(&self) -> YearMonth {
        YearMonth::of(&self.now())
    }
}

pub type PaymentSourceBox = Box<dyn PaymentSource>;
pub type ClockSourceBox = Box<dyn ClockSource>;
