//! Descriptor builder: turns a record schema into the ordered list of
//! (external name, field path, self-scanning) entries that the materializer
//! renders against live instances.
//!
//! Order is declaration order, with embedded records expanded depth-first at
//! the point they are declared. Private fields never produce entries.

use std::any::TypeId;
use std::panic::{self, AssertUnwindSafe};

use rowbind_core::error::{Error, Result};
use rowbind_core::schema::{FieldKind, Shape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEntry {
    /// External (column) name.
    pub name: String,
    /// Field indices from the root record down to the receiving field.
    pub path: Vec<usize>,
    pub self_scanning: bool,
}

/// Instance-agnostic field layout of one record type. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    type_name: &'static str,
    entries: Vec<DescriptorEntry>,
}

impl Descriptor {
    /// Build the descriptor for `shape`.
    ///
    /// A schema callback that panics is reported as `Error::Introspection`.
    /// Embedded cycles are rejected with `Error::Structural`.
    pub fn build(shape: &Shape) -> Result<Self> {
        let mut entries = Vec::new();
        let mut path = Vec::new();
        let mut visiting = Vec::new();
        collect(shape, &mut path, &mut visiting, &mut entries)?;
        Ok(Self {
            type_name: shape.type_name(),
            entries,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn entries(&self) -> &[DescriptorEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect(
    shape: &Shape,
    path: &mut Vec<usize>,
    visiting: &mut Vec<TypeId>,
    out: &mut Vec<DescriptorEntry>,
) -> Result<()> {
    if visiting.contains(&shape.id()) {
        return Err(Error::Structural(format!(
            "self-referential composition in {}",
            shape.type_name()
        )));
    }

    let schema = panic::catch_unwind(AssertUnwindSafe(|| shape.schema())).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown fault".to_string());
        Error::Introspection {
            type_name: shape.type_name(),
            message,
        }
    })?;

    visiting.push(shape.id());
    for (idx, field) in schema.fields.iter().enumerate() {
        match field.kind {
            FieldKind::Column { self_scanning } => {
                if let (true, Some(tag)) = (field.exported, field.tag) {
                    let mut entry_path = Vec::with_capacity(path.len() + 1);
                    entry_path.extend_from_slice(path);
                    entry_path.push(idx);
                    out.push(DescriptorEntry {
                        name: tag.to_string(),
                        path: entry_path,
                        self_scanning,
                    });
                }
            }
            FieldKind::Embedded(inner) => {
                path.push(idx);
                let res = collect(&inner, path, visiting, out);
                path.pop();
                res?;
            }
            FieldKind::Opaque => {}
        }
    }
    visiting.pop();

    Ok(())
}
