//! CSV row source backed by the `csv` crate.
//!
//! Every cell is delivered as `Value::Str`; typed fields parse it during
//! transfer. Reader failures end iteration and are reported through `err()`.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use rowbind_core::error::BoxError;
use rowbind_core::handle::Handle;
use rowbind_core::source::{AdvancedScannable, IterableScannable, Scannable};
use rowbind_core::value::Value;

use crate::assign::assign;
use crate::error::{IoError, Result};

pub struct CsvRows<R> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
    has_row: bool,
    rows_read: usize,
    failure: Option<Arc<csv::Error>>,
}

impl<R: Read> CsvRows<R> {
    /// Read CSV with a header row from `rdr`.
    pub fn from_reader(rdr: R) -> Self {
        Self::from_csv(csv::ReaderBuilder::new().has_headers(true).from_reader(rdr))
    }

    /// Wrap a configured reader. Without headers, column names are reported
    /// as unavailable and scans are verbatim.
    pub fn from_csv(reader: csv::Reader<R>) -> Self {
        Self {
            reader,
            record: csv::StringRecord::new(),
            has_row: false,
            rows_read: 0,
            failure: None,
        }
    }

    /// Number of records read so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

impl CsvRows<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        Ok(Self::from_csv(reader))
    }
}

impl<R: Read> Scannable for CsvRows<R> {
    fn scan(&mut self, dest: &mut [Handle<'_>]) -> std::result::Result<(), BoxError> {
        if !self.has_row {
            return Err(IoError::NoRow.into());
        }
        if self.record.len() != dest.len() {
            return Err(IoError::Width {
                expected: self.record.len(),
                got: dest.len(),
            }
            .into());
        }
        for (handle, cell) in dest.iter_mut().zip(self.record.iter()) {
            assign(handle, Value::Str(cell.to_string()))?;
        }
        Ok(())
    }
}

impl<R: Read> AdvancedScannable for CsvRows<R> {
    fn column_names(&mut self) -> std::result::Result<Option<Vec<String>>, BoxError> {
        if !self.reader.has_headers() {
            return Ok(None);
        }
        let headers = self.reader.headers().map_err(IoError::from)?;
        Ok(Some(headers.iter().map(str::to_string).collect()))
    }
}

impl<R: Read> IterableScannable for CsvRows<R> {
    fn advance(&mut self) -> bool {
        if self.failure.is_some() {
            return false;
        }
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.has_row = true;
                self.rows_read += 1;
                #[cfg(feature = "tracing")]
                tracing::trace!(row = self.rows_read, fields = self.record.len(), "read csv record");
                true
            }
            Ok(false) => {
                self.has_row = false;
                false
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(row = self.rows_read + 1, error = %e, "csv reader failed");
                self.has_row = false;
                self.failure = Some(Arc::new(e));
                false
            }
        }
    }

    fn err(&mut self) -> std::result::Result<(), BoxError> {
        match &self.failure {
            Some(e) => Err(IoError::Reader(Arc::clone(e)).into()),
            None => Ok(()),
        }
    }
}
