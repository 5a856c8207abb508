//! Input readers and report output.

pub mod csv;
pub mod report;
