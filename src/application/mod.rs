//! Application layer containing the payment queries.
//!
//! This module defines the `PaymentQueryService`, the entry point for every
//! report. It reads payments through the `PaymentSource` port and the current
//! time through the `ClockSource` port, and never mutates either.

pub mod query;
