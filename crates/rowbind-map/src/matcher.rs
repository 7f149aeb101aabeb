//! Column matcher: aligns incoming column names with runtime field names.
//!
//! Each field, in field order, claims the leftmost unclaimed column with the
//! same name. Unclaimed columns are discarded; unmatched fields are simply
//! left unpopulated. Two strategies implement this rule and must agree:
//! a nested O(m*n) scan for small inputs and per-name position buckets for
//! large ones.

use std::collections::HashMap;

use rowbind_core::config::ScanConfig;
use rowbind_core::error::{Error, Result};
use rowbind_core::handle::NamedFields;
use rowbind_core::source::AdvancedScannable;

/// Column index -> field index, or `None` to discard that column.
///
/// Reusable across rows that share a column layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanMap(Vec<Option<usize>>);

impl ScanMap {
    pub fn new(slots: Vec<Option<usize>>) -> Self {
        Self(slots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Target field for column `column`; `None` if out of range or discarded.
    pub fn field_for(&self, column: usize) -> Option<usize> {
        self.0.get(column).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Option<usize>> {
        self.0
    }
}

impl From<Vec<Option<usize>>> for ScanMap {
    fn from(slots: Vec<Option<usize>>) -> Self {
        Self(slots)
    }
}

/// Build a `ScanMap` from the source's columns and the field list names.
///
/// `Ok(None)` means the source has no column metadata: apply the field list
/// verbatim. Uses `ScanConfig::global()`.
pub fn build_map<S>(source: &mut S, fields: &NamedFields<'_>) -> Result<Option<ScanMap>>
where
    S: AdvancedScannable + ?Sized,
{
    build_map_with(source, fields, ScanConfig::global())
}

pub fn build_map_with<S>(
    source: &mut S,
    fields: &NamedFields<'_>,
    config: &ScanConfig,
) -> Result<Option<ScanMap>>
where
    S: AdvancedScannable + ?Sized,
{
    let columns = source.column_names().map_err(Error::Columns)?;
    Ok(columns.map(|columns| match_columns(&columns, fields.names(), config)))
}

/// Pure matching step; picks a strategy from `config`.
pub fn match_columns<C, N>(columns: &[C], names: &[N], config: &ScanConfig) -> ScanMap
where
    C: AsRef<str>,
    N: AsRef<str>,
{
    let hashed = config.use_hashed(columns.len(), names.len());
    #[cfg(feature = "tracing")]
    tracing::trace!(
        columns = columns.len(),
        fields = names.len(),
        hashed,
        "matching columns"
    );
    if hashed {
        match_hashed(columns, names)
    } else {
        match_nested(columns, names)
    }
}

fn match_nested<C: AsRef<str>, N: AsRef<str>>(columns: &[C], names: &[N]) -> ScanMap {
    let mut out = vec![None; columns.len()];

    'fields: for (i, name) in names.iter().enumerate() {
        for (j, column) in columns.iter().enumerate() {
            if out[j].is_some() {
                continue;
            }
            if name.as_ref() == column.as_ref() {
                out[j] = Some(i);
                continue 'fields;
            }
        }
        // No column for this field; it stays unpopulated.
    }

    ScanMap(out)
}

/// Column positions sharing one name, consumed left to right.
#[derive(Default)]
struct Bucket {
    positions: Vec<usize>,
    next: usize,
}

impl Bucket {
    fn claim(&mut self) -> Option<usize> {
        let pos = self.positions.get(self.next).copied()?;
        self.next += 1;
        Some(pos)
    }
}

fn match_hashed<C: AsRef<str>, N: AsRef<str>>(columns: &[C], names: &[N]) -> ScanMap {
    let mut out = vec![None; columns.len()];

    let mut buckets: HashMap<&str, Bucket> = HashMap::with_capacity(columns.len());
    for (j, column) in columns.iter().enumerate() {
        buckets
            .entry(column.as_ref())
            .or_default()
            .positions
            .push(j);
    }

    for (i, name) in names.iter().enumerate() {
        if let Some(j) = buckets.get_mut(name.as_ref()).and_then(Bucket::claim) {
            out[j] = Some(i);
        }
    }

    ScanMap(out)
}
