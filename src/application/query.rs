use crate::domain::ordering::PaymentOrder;
use crate::domain::payment::{Payment, PaymentItem};
use crate::domain::period::YearMonth;
use crate::domain::ports::{ClockSourceBox, PaymentSourceBox};
use crate::error::Result;
use rust_decimal::Decimal;
use std::collections::HashSet;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Read-only queries over the payments of a `PaymentSource`.
///
/// Every query fetches the full record set again; nothing is cached between
/// calls. "Now" and "this month" come from the injected clock only.
pub struct PaymentQueryService {
    payment_source: PaymentSourceBox,
    clock: ClockSourceBox,
}

impl PaymentQueryService {
    /// Creates a new `PaymentQueryService`.
    ///
    /// # Arguments
    ///
    /// * `payment_source` - Where payments are read from.
    /// * `clock` - The source of the current time and month.
    pub fn new(payment_source: PaymentSourceBox, clock: ClockSourceBox) -> Self {
        Self {
            payment_source,
            clock,
        }
    }

    fn fetch(&self, query: &'static str) -> Result<Vec<Payment>> {
        let payments = self.payment_source.fetch_all()?;
        tracing::debug!(query, fetched = payments.len(), "running payment query");
        Ok(payments)
    }

    /// Returns all payments sorted with the given strategy. Ties keep source order.
    pub fn sorted_by(&self, order: PaymentOrder) -> Result<Vec<Payment>> {
        let mut payments = self.fetch("sorted_by")?;
        order.sort(&mut payments);
        Ok(payments)
    }

    pub fn sorted_by_date_ascending(&self) -> Result<Vec<Payment>> {
        self.sorted_by(PaymentOrder::DATE_ASC)
    }

    pub fn sorted_by_date_descending(&self) -> Result<Vec<Payment>> {
        self.sorted_by(PaymentOrder::DATE_DESC)
    }

    pub fn sorted_by_item_count_ascending(&self) -> Result<Vec<Payment>> {
        self.sorted_by(PaymentOrder::ITEM_COUNT_ASC)
    }

    pub fn sorted_by_item_count_descending(&self) -> Result<Vec<Payment>> {
        self.sorted_by(PaymentOrder::ITEM_COUNT_DESC)
    }

    /// Payments dated within `month`, judged by each payment's own offset.
    pub fn for_month(&self, month: YearMonth) -> Result<Vec<Payment>> {
        Ok(self
            .fetch("for_month")?
            .into_iter()
            .filter(|payment| month.contains(&payment.payment_date))
            .collect())
    }

    pub fn for_current_month(&self) -> Result<Vec<Payment>> {
        self.for_month(self.clock.current_year_month())
    }

    /// Payments less than `days` whole days old.
    ///
    /// Age is measured in seconds and truncated toward zero, so a payment made
    /// 47 hours ago is one day old. Payments dated after "now" have an age of
    /// zero or less and are kept for any positive `days`.
    pub fn for_last_n_days(&self, days: i64) -> Result<Vec<Payment>> {
        let now = self.clock.now().timestamp();
        Ok(self
            .fetch("for_last_n_days")?
            .into_iter()
            .filter(|payment| (now - payment.payment_date.timestamp()) / SECONDS_PER_DAY < days)
            .collect())
    }

    pub fn with_exactly_one_item(&self) -> Result<HashSet<Payment>> {
        Ok(self
            .fetch("with_exactly_one_item")?
            .into_iter()
            .filter(|payment| payment.item_count() == 1)
            .collect())
    }

    /// Distinct names of the products sold in the clock's current month.
    pub fn products_sold_this_month(&self) -> Result<HashSet<String>> {
        Ok(self
            .for_current_month()?
            .into_iter()
            .flat_map(|payment| payment.payment_items)
            .map(|item| item.name)
            .collect())
    }

    /// Sum of final prices over all items sold in `month`.
    pub fn total_for_month(&self, month: YearMonth) -> Result<Decimal> {
        Ok(self
            .for_month(month)?
            .iter()
            .flat_map(|payment| &payment.payment_items)
            .map(|item| item.final_price)
            .sum())
    }

    /// Sum of the discounts granted over all items sold in `month`.
    pub fn discount_total_for_month(&self, month: YearMonth) -> Result<Decimal> {
        Ok(self
            .for_month(month)?
            .iter()
            .flat_map(|payment| &payment.payment_items)
            .map(PaymentItem::discount)
            .sum())
    }

    /// Every item bought by the user with exactly this email, in source order.
    pub fn items_for_user_email(&self, email: &str) -> Result<Vec<PaymentItem>> {
        Ok(self
            .fetch("items_for_user_email")?
            .into_iter()
            .filter(|payment| payment.user.email == email)
            .flat_map(|payment| payment.payment_items)
            .collect())
    }

    /// Payments whose regular-price total is strictly above `threshold`.
    pub fn payments_over_value(&self, threshold: i64) -> Result<HashSet<Payment>> {
        let threshold = Decimal::from(threshold);
        Ok(self
            .fetch("payments_over_value")?
            .into_iter()
            .filter(|payment| payment.regular_total() > threshold)
            .collect())
    }
}
