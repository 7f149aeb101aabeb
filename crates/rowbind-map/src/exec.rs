//! Scan executor and the single-object scan entry points.

use rowbind_core::error::{Error, Result};
use rowbind_core::handle::{Handle, NamedFields};
use rowbind_core::record::ScanInto;
use rowbind_core::source::{AdvancedScannable, Scannable};

use crate::fields::build_named_fields;
use crate::matcher::{build_map, ScanMap};

/// Hand the field list's handles to `source` for one row.
///
/// With `map == None` the handles are passed verbatim, in order. Otherwise
/// one handle per mapped column is passed, with a discard receiver for every
/// column the map does not route to a field. An empty handle list is always
/// rejected. The source's own error is returned unchanged.
pub fn scan_with_mapped_fields<S>(
    source: &mut S,
    map: Option<&ScanMap>,
    fields: NamedFields<'_>,
) -> Result<()>
where
    S: Scannable + ?Sized,
{
    let mut dest = match map {
        None => fields.into_handles(),
        Some(map) => route(map, fields)?,
    };

    if dest.is_empty() {
        return Err(Error::EmptyScan);
    }

    source.scan(&mut dest).map_err(Error::Transfer)
}

fn route<'a>(map: &ScanMap, fields: NamedFields<'a>) -> Result<Vec<Handle<'a>>> {
    let total = fields.len();
    let mut slots: Vec<Option<Handle<'a>>> =
        fields.into_handles().into_iter().map(Some).collect();

    map.iter()
        .enumerate()
        .map(|(column, target)| match target {
            None => Ok(Handle::Discard),
            Some(idx) => match slots.get_mut(idx) {
                Some(slot) => slot.take().ok_or_else(|| {
                    Error::Map(format!("field {idx} is claimed by more than one column"))
                }),
                None => Err(Error::Map(format!(
                    "column {column} maps to field {idx}, but only {total} fields exist"
                ))),
            },
        })
        .collect()
}

/// Scan one row into `into` positionally, without consulting column names.
///
/// The caller guarantees the row's columns line up with the targets' fields.
pub fn quick_scan<S>(source: &mut S, into: &mut [&mut dyn ScanInto]) -> Result<()>
where
    S: Scannable + ?Sized,
{
    let fields = build_named_fields(into)?;
    scan_with_mapped_fields(source, None, fields)?;
    post_scan(into)
}

/// Scan one row into `into`, matching columns to fields by name.
pub fn scan<S>(source: &mut S, into: &mut [&mut dyn ScanInto]) -> Result<()>
where
    S: AdvancedScannable + ?Sized,
{
    let fields = build_named_fields(into)?;
    let map = build_map(source, &fields)?;
    scan_with_mapped_fields(source, map.as_ref(), fields)?;
    post_scan(into)
}

/// Scan one row into a pre-built field list. No post-scan hooks run.
pub fn scan_with_fields<S>(source: &mut S, fields: NamedFields<'_>) -> Result<()>
where
    S: AdvancedScannable + ?Sized,
{
    let map = build_map(source, &fields)?;
    scan_with_mapped_fields(source, map.as_ref(), fields)
}

/// Scan one row into `into` using a map built earlier for the same layout.
pub fn scan_with_map<S>(
    source: &mut S,
    map: Option<&ScanMap>,
    into: &mut [&mut dyn ScanInto],
) -> Result<()>
where
    S: Scannable + ?Sized,
{
    let fields = build_named_fields(into)?;
    scan_with_mapped_fields(source, map, fields)?;
    post_scan(into)
}

/// Run each target's post-scan hook in order, stopping at the first failure.
pub fn post_scan(into: &mut [&mut dyn ScanInto]) -> Result<()> {
    for target in into.iter_mut() {
        target.post_scan().map_err(Error::PostScan)?;
    }
    Ok(())
}
