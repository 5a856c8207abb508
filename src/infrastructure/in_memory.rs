use crate::domain::payment::Payment;
use crate::domain::ports::PaymentSource;
use crate::error::Result;

/// An in-memory payment source.
///
/// Every fetch hands out a fresh copy of the records, so callers can sort and
/// filter without touching what the source holds.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPaymentSource {
    payments: Vec<Payment>,
}

impl InMemoryPaymentSource {
    /// Creates a source over the given payments, kept in the order supplied.
    pub fn new(payments: Vec<Payment>) -> Self {
        Self { payments }
    }
}

impl From<Vec<Payment>> for InMemoryPaymentSource {
    fn from(payments: Vec<Payment>) -> Self {
        Self::new(payments)
    }
}

impl PaymentSource for InMemoryPaymentSource {
    fn fetch_all(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{PaymentItem, User};
    use chrono::DateTime;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_in_memory_source_preserves_order() {
        let user = Arc::new(User::new("a@example.com"));
        let payments: Vec<Payment> = (1..=3)
            .map(|id| {
                Payment::new(
                    id,
                    DateTime::parse_from_rfc3339("2023-06-01T10:00:00Z").unwrap(),
                    user.clone(),
                    vec![PaymentItem::new("A", dec!(1.0), dec!(1.0))],
                )
            })
            .collect();

        let source = InMemoryPaymentSource::new(payments.clone());
        let fetched = source.fetch_all().unwrap();
        assert_eq!(fetched, payments);
        assert_eq!(fetched.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_source() {
        let source = InMemoryPaymentSource::default();
        assert!(source.fetch_all().unwrap().is_empty());
    }
}
