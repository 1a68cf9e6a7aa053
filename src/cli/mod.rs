//! CLI module
//!
//! Command-line interface for downloading reports.
//!
//! The binary fetches the daily sales summary and the monthly finance
//! report for a vendor and writes each gzip document to disk unchanged.

mod commands;
mod runner;

pub use commands::{Cli, Frequency};
pub use runner::{previous_month, Runner};
