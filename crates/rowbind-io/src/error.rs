use std::sync::Arc;

use thiserror::Error;

/// Errors raised by the bundled row sources while transferring values.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot assign {from} value to {to}")]
    Convert { from: &'static str, to: &'static str },

    #[error("cannot parse {input:?} as {to}")]
    Parse { input: String, to: &'static str },

    /// The destination field has a type the bundled sources do not write.
    #[error("unsupported destination type for {from} value")]
    Unsupported { from: &'static str },

    #[error("expected {expected} destination arguments in scan, not {got}")]
    Width { expected: usize, got: usize },

    #[error("scan called without a current row")]
    NoRow,

    #[error("csv reader failed: {0}")]
    Reader(#[source] Arc<csv::Error>),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid table: {0}")]
    Table(String),
}

pub type Result<T> = std::result::Result<T, IoError>;
