//! Payment records, calendar periods, orderings and the ports the query
//! service reads through.

pub mod ordering;
pub mod payment;
pub mod period;
pub mod ports;
