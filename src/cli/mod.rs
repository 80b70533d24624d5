//! Command-line driver for the objrest binary.

pub mod args;
pub mod driver;
pub mod reporter;
