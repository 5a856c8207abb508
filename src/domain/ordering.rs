use super::payment::Payment;
use std::cmp::Ordering;

/// The attribute payments are sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    ItemCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A named comparison strategy over payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl PaymentOrder {
    pub const DATE_ASC: Self = Self::new(SortKey::Date, SortDirection::Ascending);
    pub const DATE_DESC: Self = Self::new(SortKey::Date, SortDirection::Descending);
    pub const ITEM_COUNT_ASC: Self = Self::new(SortKey::ItemCount, SortDirection::Ascending);
    pub const ITEM_COUNT_DESC: Self = Self::new(SortKey::ItemCount, SortDirection::Descending);

    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn compare(&self, a: &Payment, b: &Payment) -> Ordering {
        let ordering = match self.key {
            SortKey::Date => a.payment_date.cmp(&b.payment_date),
            SortKey::ItemCount => a.item_count().cmp(&b.item_count()),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Sorts in place. Equal elements keep their relative order.
    pub fn sort(&self, payments: &mut [Payment]) {
        payments.sort_by(|a, b| self.compare(a, b));
    }
}
