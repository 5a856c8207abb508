#![allow(dead_code)]

use chrono::{DateTime, Duration, FixedOffset};
use payreport::application::query::PaymentQueryService;
use payreport::domain::payment::{Payment, PaymentItem, User};
use payreport::infrastructure::clock::FixedClock;
use payreport::infrastructure::in_memory::InMemoryPaymentSource;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn date(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).expect("valid RFC 3339 timestamp")
}

pub fn service_at(now: &str, payments: Vec<Payment>) -> PaymentQueryService {
    PaymentQueryService::new(
        Box::new(InMemoryPaymentSource::new(payments)),
        Box::new(FixedClock::new(date(now))),
    )
}

/// Random payments dated within the 90 days up to and including `around`,
/// with distinct timestamps and prices in cents.
pub fn random_payments<R: Rng>(rng: &mut R, count: usize, around: &str) -> Vec<Payment> {
    let base = date(around);
    let users: Vec<Arc<User>> = ["anna@example.com", "bob@example.com", "carl@example.com"]
        .into_iter()
        .map(|email| Arc::new(User::new(email)))
        .collect();
    let products = ["Keyboard", "Mouse", "Monitor", "Cable", "Laptop"];

    let mut offsets: Vec<i64> = Vec::with_capacity(count);
    while offsets.len() < count {
        let offset = rng.gen_range(-90 * 24 * 3600..=0);
        if !offsets.contains(&offset) {
            offsets.push(offset);
        }
    }

    offsets
        .into_iter()
        .enumerate()
        .map(|(i, offset)| {
            let items = (0..rng.gen_range(0..4))
                .map(|_| {
                    let regular: i64 = rng.gen_range(1..50_000);
                    let discount: i64 = rng.gen_range(0..=regular);
                    PaymentItem::new(
                        products[rng.gen_range(0..products.len())],
                        Decimal::new(regular, 2),
                        Decimal::new(regular - discount, 2),
                    )
                })
                .collect();
            Payment::new(
                i as u64 + 1,
                base + Duration::seconds(offset),
                users[rng.gen_range(0..users.len())].clone(),
                items,
            )
        })
        .collect()
}
