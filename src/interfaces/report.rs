use crate::domain::payment::{Payment, PaymentItem};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;

/// Writes query results as pretty-printed JSON.
///
/// Set results have no inherent order, so they are sorted before writing:
/// payments by id, names alphabetically.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_payments(&mut self, payments: &[Payment]) -> Result<()> {
        self.write(&payments)
    }

    pub fn write_payment_set(&mut self, payments: HashSet<Payment>) -> Result<()> {
        let mut payments: Vec<Payment> = payments.into_iter().collect();
        payments.sort_by(|a, b| a.id.cmp(&b.id).then(a.payment_date.cmp(&b.payment_date)));
        self.write(&payments)
    }

    pub fn write_items(&mut self, items: &[PaymentItem]) -> Result<()> {
        self.write(&items)
    }

    pub fn write_names(&mut self, names: HashSet<String>) -> Result<()> {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        self.write(&names)
    }

    /// Amounts are written as JSON strings to keep them exact.
    pub fn write_amount(&mut self, amount: Decimal) -> Result<()> {
        self.write(&amount)
    }

    fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
