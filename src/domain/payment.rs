use super::period::YearMonth;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The owner of a payment.
///
/// Payments made by the same user share one `Arc<User>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }
}

/// A single line item of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentItem {
    pub name: String,
    pub regular_price: Decimal,
    pub final_price: Decimal,
}

impl PaymentItem {
    pub fn new(name: impl Into<String>, regular_price: Decimal, final_price: Decimal) -> Self {
        Self {
            name: name.into(),
            regular_price,
            final_price,
        }
    }

    /// Amount knocked off the regular price.
    pub fn discount(&self) -> Decimal {
        self.regular_price - self.final_price
    }
}

/// A completed payment.
///
/// Two payments are equal when their id, date and items are equal. The user
/// does not take part in equality or hashing, so sets of payments collapse on
/// the transaction itself rather than on who made it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub payment_date: DateTime<FixedOffset>,
    pub user: Arc<User>,
    #[serde(default)]
    pub payment_items: Vec<PaymentItem>,
}

impl Payment {
    pub fn new(
        id: u64,
        payment_date: DateTime<FixedOffset>,
        user: Arc<User>,
        payment_items: Vec<PaymentItem>,
    ) -> Self {
        Self {
            id,
            payment_date,
            user,
            payment_items,
        }
    }

    pub fn item_count(&self) -> usize {
        self.payment_items.len()
    }

    /// Sum of the regular prices of all items.
    pub fn regular_total(&self) -> Decimal {
        self.payment_items
            .iter()
            .map(|item| item.regular_price)
            .sum()
    }

    /// The calendar month of the payment in its own offset.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(&self.payment_date)
    }
}

/// Points payments of the same email at one shared `User`, the first one seen.
pub fn share_users(payments: &mut [Payment]) {
    let mut users: HashMap<String, Arc<User>> = HashMap::new();
    for payment in payments.iter_mut() {
        let shared = users
            .entry(payment.user.email.clone())
            .or_insert_with(|| payment.user.clone());
        payment.user = shared.clone();
    }
}

impl PartialEq for Payment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.payment_date == other.payment_date
            && self.payment_items == other.payment_items
    }
}

impl Eq for Payment {}

impl Hash for Payment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.payment_date.hash(state);
        self.payment_items.hash(state);
    }
}
