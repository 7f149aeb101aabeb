//! In-memory row sources for testing and for callers that already hold rows.
//!
//! `MemoryRows` is a small table implementing every row-source capability.
//! A table built without column names reports metadata as unavailable, so
//! scans apply their field lists verbatim. `ValueRow` is a bare single row.

use serde::{Deserialize, Serialize};

use rowbind_core::error::BoxError;
use rowbind_core::handle::Handle;
use rowbind_core::source::{AdvancedScannable, IterableScannable, Scannable};
use rowbind_core::value::Value;

use crate::assign::assign;
use crate::error::{IoError, Result};

/// Serializable table contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    table: Table,
    cursor: Option<usize>,
}

impl MemoryRows {
    /// Table with known column names.
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_table(Table {
            columns: Some(columns.into_iter().map(Into::into).collect()),
            rows,
        })
    }

    /// Table whose column names are unknown (verbatim scans).
    pub fn without_columns(rows: Vec<Vec<Value>>) -> Self {
        Self::from_table(Table {
            columns: None,
            rows,
        })
    }

    pub fn from_table(table: Table) -> Self {
        Self {
            table,
            cursor: None,
        }
    }

    /// Parse a table such as `{"columns":["a"],"rows":[[{"I64":1}]]}`.
    ///
    /// Rows must be as wide as `columns` when columns are given.
    pub fn from_json(s: &str) -> Result<Self> {
        let table: Table =
            serde_json::from_str(s).map_err(|e| IoError::Table(e.to_string()))?;
        if let Some(columns) = &table.columns {
            if let Some((idx, row)) = table
                .rows
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != columns.len())
            {
                return Err(IoError::Table(format!(
                    "row {} has {} values for {} columns",
                    idx,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self::from_table(table))
    }

    /// Append a row at the end of the table.
    pub fn push_row(&mut self, row: Vec<Value>) {
        self.table.rows.push(row);
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Position of the current row, if `advance` has returned `true`.
    pub fn position(&self) -> Option<usize> {
        self.cursor.filter(|&c| c < self.table.rows.len())
    }

    /// Restart iteration from before the first row.
    pub fn rewind(&mut self) {
        self.cursor = None;
    }
}

impl Scannable for MemoryRows {
    fn scan(&mut self, dest: &mut [Handle<'_>]) -> std::result::Result<(), BoxError> {
        // A table that was never advanced scans its first row.
        let pos = self.cursor.unwrap_or(0);
        let row = self.table.rows.get(pos).ok_or(IoError::NoRow)?;
        scan_row(row, dest)
    }
}

impl AdvancedScannable for MemoryRows {
    fn column_names(&mut self) -> std::result::Result<Option<Vec<String>>, BoxError> {
        Ok(self.table.columns.clone())
    }
}

impl IterableScannable for MemoryRows {
    fn advance(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next.min(self.table.rows.len()));
        next < self.table.rows.len()
    }

    fn err(&mut self) -> std::result::Result<(), BoxError> {
        Ok(())
    }
}

/// A single row with no column metadata; only supports `scan`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow(pub Vec<Value>);

impl ValueRow {
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }
}

impl Scannable for ValueRow {
    fn scan(&mut self, dest: &mut [Handle<'_>]) -> std::result::Result<(), BoxError> {
        scan_row(&self.0, dest)
    }
}

/// Transfer `row` into `dest`, which must be exactly as wide as the row.
pub fn scan_row(row: &[Value], dest: &mut [Handle<'_>]) -> std::result::Result<(), BoxError> {
    if row.len() != dest.len() {
        return Err(IoError::Width {
            expected: row.len(),
            got: dest.len(),
        }
        .into());
    }
    for (handle, value) in dest.iter_mut().zip(row) {
        assign(handle, value.clone())?;
    }
    Ok(())
}
