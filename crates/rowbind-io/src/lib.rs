#![forbid(unsafe_code)]
//! rowbind-io: concrete row sources for the rowbind engine.
//!
//! - `MemoryRows`: an in-memory table, with or without column names.
//! - `ValueRow`: one bare row for positional scans.
//! - `CsvRows`: a CSV stream with a header row.
//!
//! All of them transfer values through `assign`, which is also usable by
//! third-party sources.

pub mod assign;
pub mod csv;
pub mod error;
pub mod memory;

pub use crate::assign::{assign, assign_field, FromValue};
pub use crate::csv::CsvRows;
pub use crate::error::IoError;
pub use crate::memory::{scan_row, MemoryRows, Table, ValueRow};
