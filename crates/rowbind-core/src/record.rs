//! Target capabilities: records, field-listing overrides, and post-scan hooks.
//!
//! Targets reach the engine as `&mut dyn ScanInto`. Each one resolves to a
//! `Target`, which tells the field materializer how to obtain handles:
//! - `Record`: walk the cached descriptor for the record's shape.
//! - `Override`: call the target's own field listing, verbatim.
//! - `Unusable`: rejected with a structural error naming the kind.

use std::any::Any;

use crate::error::BoxError;
use crate::handle::{NamedFields, Scanner};
use crate::schema::{Schema, Shape};

/// Mutable access to one declared field of a record instance.
pub enum FieldMut<'a> {
    Plain(&'a mut dyn Any),
    Scanner(&'a mut dyn Scanner),
    Embedded(&'a mut dyn Record),
    /// Declared but never a column (untagged, nested, private).
    Opaque,
}

impl FieldMut<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldMut::Plain(_) => "plain",
            FieldMut::Scanner(_) => "scanner",
            FieldMut::Embedded(_) => "embedded",
            FieldMut::Opaque => "opaque",
        }
    }
}

/// A structure whose fields can be populated from a row.
///
/// Invariant: `fields_mut` yields exactly one entry per `schema()` field, in
/// the same order, with a variant matching each field's `FieldKind`.
/// The `record!` macro upholds this; hand-written impls must too.
pub trait Record: 'static {
    fn schema() -> Schema
    where
        Self: Sized;

    /// Identity used as the descriptor cache key.
    fn shape(&self) -> Shape;

    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

/// Field-listing override: the target supplies its own (name, handle) list.
pub trait ListFields {
    fn list_fields(&mut self) -> Result<NamedFields<'_>, BoxError>;
}

/// What a target resolves to once indirections are unwrapped.
pub enum Target<'a> {
    Record(&'a mut dyn Record),
    Override(&'a mut dyn ListFields),
    Unusable(&'static str),
}

/// Anything that may be handed to a scan as a target.
pub trait ScanInto {
    fn resolve(&mut self) -> Target<'_>;

    /// Runs once after a full (non-array) scan of this target.
    fn post_scan(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

// A record that is already resolved.
impl ScanInto for dyn Record {
    fn resolve(&mut self) -> Target<'_> {
        Target::Record(self)
    }
}

impl<T: ScanInto + ?Sized> ScanInto for &mut T {
    fn resolve(&mut self) -> Target<'_> {
        (**self).resolve()
    }

    fn post_scan(&mut self) -> Result<(), BoxError> {
        (**self).post_scan()
    }
}

impl<T: ScanInto + ?Sized> ScanInto for Box<T> {
    fn resolve(&mut self) -> Target<'_> {
        (**self).resolve()
    }

    fn post_scan(&mut self) -> Result<(), BoxError> {
        (**self).post_scan()
    }
}

impl<T: ScanInto> ScanInto for Option<T> {
    fn resolve(&mut self) -> Target<'_> {
        match self {
            Some(inner) => inner.resolve(),
            None => Target::Unusable("nil"),
        }
    }

    fn post_scan(&mut self) -> Result<(), BoxError> {
        match self {
            Some(inner) => inner.post_scan(),
            None => Ok(()),
        }
    }
}

macro_rules! unusable_target {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl ScanInto for $ty {
                fn resolve(&mut self) -> Target<'_> {
                    Target::Unusable($kind)
                }
            }
        )*
    };
}

unusable_target!(
    bool => "bool",
    i32 => "int32",
    i64 => "int64",
    u32 => "uint32",
    u64 => "uint64",
    f32 => "float32",
    f64 => "float64",
    String => "string",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indirections_resolve() {
        let mut none: Option<Box<i64>> = None;
        assert!(matches!(none.resolve(), Target::Unusable("nil")));

        let mut some = Some(Box::new(5i64));
        assert!(matches!(some.resolve(), Target::Unusable("int64")));
        assert!(some.post_scan().is_ok());
    }
}
