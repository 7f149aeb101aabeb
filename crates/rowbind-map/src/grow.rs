//! Sequence grower: scans every remaining row of an iterable source, appending
//! one populated element per row to each target sequence.
//!
//! On any failure inside the loop, every sequence is truncated by exactly one
//! element before the error is returned, so callers only ever observe fully
//! populated elements.

use rowbind_core::error::{Error, Result};
use rowbind_core::handle::NamedFields;
use rowbind_core::record::ScanInto;
use rowbind_core::source::IterableScannable;

use crate::exec::scan_with_mapped_fields;
use crate::fields::get_fields_from;
use crate::matcher::{build_map, ScanMap};

/// A growable sequence of scan targets.
///
/// Elements are materialized like any single-row target, so records and
/// field-listing overrides both work.
pub trait ScanIntoArray {
    /// A detached zero-value element, used to work out the column layout.
    fn zero(&self) -> Box<dyn ScanInto>;

    /// Append a zero-value element.
    fn push_zero(&mut self);

    /// The most recently appended element.
    fn last_element(&mut self) -> Option<&mut dyn ScanInto>;

    /// Drop the most recently appended element.
    fn rewind(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ScanInto + Default + 'static> ScanIntoArray for Vec<T> {
    fn zero(&self) -> Box<dyn ScanInto> {
        Box::new(T::default())
    }

    fn push_zero(&mut self) {
        self.push(T::default());
    }

    fn last_element(&mut self) -> Option<&mut dyn ScanInto> {
        self.as_mut_slice()
            .last_mut()
            .map(|last| last as &mut dyn ScanInto)
    }

    fn rewind(&mut self) {
        self.pop();
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Scan all remaining rows of `source`, growing each sequence in `into` by
/// one element per row. Returns the number of rows appended.
///
/// The position map is computed once, from zero-value elements, and reused
/// for every row. Post-scan hooks are not run.
pub fn scan_array<S>(source: &mut S, into: &mut [&mut dyn ScanIntoArray]) -> Result<usize>
where
    S: IterableScannable + ?Sized,
{
    if into.is_empty() {
        return Err(Error::Arity("empty output sequence list".into()));
    }

    let map = layout(source, into)?;

    let mut rows = 0usize;
    while source.advance() {
        for seq in into.iter_mut() {
            seq.push_zero();
        }

        if let Err(err) = fill_last(source, map.as_ref(), into) {
            #[cfg(feature = "tracing")]
            tracing::debug!(rows, error = %err, "row failed, rolling back appended elements");
            for seq in into.iter_mut() {
                seq.rewind();
            }
            return Err(err);
        }
        rows += 1;
    }

    // Nothing was appended since the last successful row.
    source.err().map_err(Error::Iteration)?;
    Ok(rows)
}

fn layout<S>(source: &mut S, into: &[&mut dyn ScanIntoArray]) -> Result<Option<ScanMap>>
where
    S: IterableScannable + ?Sized,
{
    let mut zeros: Vec<Box<dyn ScanInto>> = into.iter().map(|seq| seq.zero()).collect();
    let mut fields = NamedFields::new();
    for zero in zeros.iter_mut() {
        fields.append(get_fields_from(&mut **zero)?);
    }
    build_map(source, &fields)
}

fn fill_last<S>(
    source: &mut S,
    map: Option<&ScanMap>,
    into: &mut [&mut dyn ScanIntoArray],
) -> Result<()>
where
    S: IterableScannable + ?Sized,
{
    source.err().map_err(Error::Iteration)?;

    let mut fields = NamedFields::new();
    for seq in into.iter_mut() {
        let last = seq
            .last_element()
            .ok_or_else(|| Error::Structural("sequence did not grow".into()))?;
        fields.append(get_fields_from(last)?);
    }
    scan_with_mapped_fields(source, map, fields)
}
