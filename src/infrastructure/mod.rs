//! Concrete payment sources and clocks.

pub mod clock;
pub mod file;
pub mod in_memory;
