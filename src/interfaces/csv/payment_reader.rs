use crate::domain::payment::{Payment, PaymentItem, User};
use crate::error::{PaymentError, Result};
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

/// One CSV row, describing one item of a payment.
///
/// Dates and prices are kept as text and parsed explicitly so amounts never
/// pass through a float.
#[derive(Debug, Deserialize)]
struct PaymentRow {
    payment: u64,
    date: String,
    email: String,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    regular_price: Option<String>,
    #[serde(default)]
    final_price: Option<String>,
}

/// Reads payments from a CSV source.
///
/// Rows sharing a payment id are folded into a single payment, in order of the
/// id's first appearance, with items in row order.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Wraps a CSV source with a header row. Fields are trimmed and rows may
    /// omit trailing columns.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Reads the whole source. The first malformed row aborts the read.
    pub fn payments(self) -> Result<Vec<Payment>> {
        let mut payments: Vec<Payment> = Vec::new();
        let mut positions: HashMap<u64, usize> = HashMap::new();
        let mut users: HashMap<String, Arc<User>> = HashMap::new();

        for row in self.reader.into_deserialize::<PaymentRow>() {
            let row = row?;
            let payment_date = DateTime::parse_from_rfc3339(&row.date).map_err(|e| {
                PaymentError::InvalidRecord(format!(
                    "payment {}: bad date '{}': {e}",
                    row.payment, row.date
                ))
            })?;
            let item = parse_item(&row)?;

            if let Some(&position) = positions.get(&row.payment) {
                let payment = &mut payments[position];
                // Rows must agree on the offset too, it decides the payment's month
                if payment.payment_date != payment_date
                    || payment.payment_date.offset() != payment_date.offset()
                    || payment.user.email != row.email
                {
                    return Err(PaymentError::InvalidRecord(format!(
                        "payment {} has conflicting date or email across rows",
                        row.payment
                    )));
                }
                payment.payment_items.extend(item);
                continue;
            }

            let user = users
                .entry(row.email.clone())
                .or_insert_with(|| {
                    Arc::new(User {
                        email: row.email.clone(),
                        name: row.user_name.clone().filter(|n| !n.is_empty()),
                    })
                })
                .clone();

            positions.insert(row.payment, payments.len());
            payments.push(Payment::new(
                row.payment,
                payment_date,
                user,
                item.into_iter().collect(),
            ));
        }

        Ok(payments)
    }
}

fn parse_item(row: &PaymentRow) -> Result<Option<PaymentItem>> {
    let non_empty = |field: &Option<String>| field.clone().filter(|v| !v.is_empty());

    match (
        non_empty(&row.name),
        non_empty(&row.regular_price),
        non_empty(&row.final_price),
    ) {
        (None, None, None) => Ok(None),
        (Some(name), Some(regular), Some(final_price)) => Ok(Some(PaymentItem::new(
            name,
            parse_price(row.payment, &regular)?,
            parse_price(row.payment, &final_price)?,
        ))),
        _ => Err(PaymentError::InvalidRecord(format!(
            "payment {}: an item needs a name, a regular price and a final price",
            row.payment
        ))),
    }
}

fn parse_price(payment: u64, text: &str) -> Result<Decimal> {
    Decimal::from_str(text).map_err(|e| {
        PaymentError::InvalidRecord(format!("payment {payment}: bad price '{text}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "payment, date, email, name, regular_price, final_price";

    #[test]
    fn test_reader_groups_rows_by_payment() {
        let data = format!(
            "{HEADER}\n\
             1, 2023-06-01T10:00:00Z, a@example.com, A, 100.00, 80.00\n\
             2, 2023-07-01T10:00:00Z, b@example.com, B, 50.00, 50.00\n\
             1, 2023-06-01T10:00:00Z, a@example.com, C, 10.00, 9.99"
        );
        let payments = PaymentReader::new(data.as_bytes()).payments().unwrap();

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].id, 1);
        let names: Vec<&str> = payments[0]
            .payment_items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(payments[0].payment_items[1].final_price, dec!(9.99));
        assert_eq!(payments[1].id, 2);
    }

    #[test]
    fn test_reader_shares_users_by_email() {
        let data = format!(
            "{HEADER}\n\
             1, 2023-06-01T10:00:00Z, a@example.com, A, 1.00, 1.00\n\
             2, 2023-06-02T10:00:00Z, a@example.com, B, 1.00, 1.00"
        );
        let payments = PaymentReader::new(data.as_bytes()).payments().unwrap();

        assert!(Arc::ptr_eq(&payments[0].user, &payments[1].user));
    }

    #[test]
    fn test_reader_keeps_exact_prices() {
        let data = format!("{HEADER}\n1, 2023-06-01T10:00:00Z, a@example.com, A, 0.1, 0.10");
        let payments = PaymentReader::new(data.as_bytes()).payments().unwrap();

        let item = &payments[0].payment_items[0];
        assert_eq!(item.regular_price, dec!(0.1));
        assert_eq!(item.discount(), Decimal::ZERO);
    }

    #[test]
    fn test_reader_payment_without_items() {
        let data = format!("{HEADER}\n1, 2023-06-01T10:00:00Z, a@example.com, , ,");
        let payments = PaymentReader::new(data.as_bytes()).payments().unwrap();

        assert_eq!(payments.len(), 1);
        assert!(payments[0].payment_items.is_empty());
    }

    #[test]
    fn test_reader_optional_user_name_column() {
        let data = "payment, date, email, user_name, name, regular_price, final_price\n\
                    1, 2023-06-01T10:00:00Z, a@example.com, Anna, A, 1.00, 1.00";
        let payments = PaymentReader::new(data.as_bytes()).payments().unwrap();

        assert_eq!(payments[0].user.name.as_deref(), Some("Anna"));
    }

    #[test]
    fn test_reader_rejects_bad_date() {
        let data = format!("{HEADER}\n1, yesterday, a@example.com, A, 1.00, 1.00");
        let result = PaymentReader::new(data.as_bytes()).payments();

        assert!(matches!(result, Err(PaymentError::InvalidRecord(_))));
    }

    #[test]
    fn test_reader_rejects_bad_price() {
        let data = format!("{HEADER}\n1, 2023-06-01T10:00:00Z, a@example.com, A, lots, 1.00");
        let result = PaymentReader::new(data.as_bytes()).payments();

        assert!(matches!(result, Err(PaymentError::InvalidRecord(_))));
    }

    #[test]
    fn test_reader_rejects_partial_item() {
        let data = format!("{HEADER}\n1, 2023-06-01T10:00:00Z, a@example.com, A, 1.00,");
        let result = PaymentReader::new(data.as_bytes()).payments();

        assert!(matches!(result, Err(PaymentError::InvalidRecord(_))));
    }

    #[test]
    fn test_reader_rejects_conflicting_rows() {
        let data = format!(
            "{HEADER}\n\
             1, 2023-06-01T10:00:00Z, a@example.com, A, 1.00, 1.00\n\
             1, 2023-06-01T10:00:00Z, b@example.com, B, 1.00, 1.00"
        );
        let result = PaymentReader::new(data.as_bytes()).payments();

        assert!(matches!(result, Err(PaymentError::InvalidRecord(_))));
    }

    #[test]
    fn test_reader_rejects_same_instant_in_other_offset() {
        let data = format!(
            "{HEADER}\n\
             1, 2023-06-30T23:30:00-02:00, a@example.com, A, 1.00, 1.00\n\
             1, 2023-07-01T01:30:00Z, a@example.com, B, 1.00, 1.00"
        );
        let result = PaymentReader::new(data.as_bytes()).payments();

        assert!(matches!(result, Err(PaymentError::InvalidRecord(_))));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!("{HEADER}\nnot-an-id, 2023-06-01T10:00:00Z, a@example.com, A, 1.00, 1.00");
        let result = PaymentReader::new(data.as_bytes()).payments();

        assert!(matches!(result, Err(PaymentError::CsvError(_))));
    }
}
