//! Row-source capabilities. Implemented by collaborators (see `rowbind-io`).
//!
//! Richer capabilities only add behavior:
//! - `Scannable`: fill an ordered list of receivers from one row.
//! - `AdvancedScannable`: also enumerate the current column names.
//! - `IterableScannable`: also advance through rows and report iteration errors.

use crate::error::BoxError;
use crate::handle::Handle;

pub trait Scannable {
    /// Fill each receiver from the current row, in order.
    fn scan(&mut self, dest: &mut [Handle<'_>]) -> Result<(), BoxError>;
}

pub trait AdvancedScannable: Scannable {
    /// Ordered column names of the current result shape.
    ///
    /// `Ok(None)` means metadata is unavailable and receivers must be
    /// applied verbatim. `Ok(Some(vec![]))` is a real, empty column list.
    fn column_names(&mut self) -> Result<Option<Vec<String>>, BoxError>;
}

pub trait IterableScannable: AdvancedScannable {
    /// Move to the next row; `false` at end of input or on failure.
    fn advance(&mut self) -> bool;

    /// Iteration-level error side channel, consulted after each advance.
    fn err(&mut self) -> Result<(), BoxError>;
}

impl<S: Scannable + ?Sized> Scannable for &mut S {
    fn scan(&mut self, dest: &mut [Handle<'_>]) -> Result<(), BoxError> {
        (**self).scan(dest)
    }
}

impl<S: AdvancedScannable + ?Sized> AdvancedScannable for &mut S {
    fn column_names(&mut self) -> Result<Option<Vec<String>>, BoxError> {
        (**self).column_names()
    }
}

impl<S: IterableScannable + ?Sized> IterableScannable for &mut S {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn err(&mut self) -> Result<(), BoxError> {
        (**self).err()
    }
}

/// Adapter giving a bare `Scannable` the iterable surface.
///
/// Yields exactly one row, never reports an iteration error (all errors are
/// raised at scan time), and reports column metadata as unavailable, so
/// receivers are applied verbatim.
#[derive(Debug)]
pub struct BasicRows<S> {
    inner: S,
    done: bool,
}

impl<S> BasicRows<S> {
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Wrap a single-row scannable so it can be used anywhere an iterable is.
pub fn wrap_basic<S: Scannable>(inner: S) -> BasicRows<S> {
    BasicRows { inner, done: false }
}

impl<S: Scannable> Scannable for BasicRows<S> {
    fn scan(&mut self, dest: &mut [Handle<'_>]) -> Result<(), BoxError> {
        self.inner.scan(dest)
    }
}

impl<S: Scannable> AdvancedScannable for BasicRows<S> {
    fn column_names(&mut self) -> Result<Option<Vec<String>>, BoxError> {
        Ok(None)
    }
}

impl<S: Scannable> IterableScannable for BasicRows<S> {
    fn advance(&mut self) -> bool {
        if self.done {
            false
        } else {
            self.done = true;
            true
        }
    }

    fn err(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}
