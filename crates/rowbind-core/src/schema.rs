//! Declarative record schemas. Pure data; no instance access here.
//!
//! A `Schema` lists every declared field of a record type in declaration
//! order. The descriptor builder in `rowbind-map` walks it to decide which
//! fields receive which columns.

use std::any::{type_name, TypeId};
use std::fmt;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A field that can receive one column value.
    Column { self_scanning: bool },
    /// Anonymous composition; flattened at this position.
    Embedded(Shape),
    /// Anything else, including named nested structures.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    /// Rust field name.
    pub name: &'static str,
    /// External (column) name, if tagged.
    pub tag: Option<&'static str>,
    /// Untagged or not, private fields never receive columns.
    pub exported: bool,
    pub kind: FieldKind,
}

impl FieldDecl {
    pub const fn column(
        name: &'static str,
        tag: &'static str,
        exported: bool,
        self_scanning: bool,
    ) -> Self {
        Self {
            name,
            tag: Some(tag),
            exported,
            kind: FieldKind::Column { self_scanning },
        }
    }

    pub const fn embedded(name: &'static str, exported: bool, shape: Shape) -> Self {
        Self {
            name,
            tag: None,
            exported,
            kind: FieldKind::Embedded(shape),
        }
    }

    pub const fn opaque(name: &'static str, exported: bool) -> Self {
        Self {
            name,
            tag: None,
            exported,
            kind: FieldKind::Opaque,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub type_name: &'static str,
    pub fields: Vec<FieldDecl>,
}

impl Schema {
    pub fn new(type_name: &'static str, fields: Vec<FieldDecl>) -> Self {
        Self { type_name, fields }
    }

    pub fn field(&self, idx: usize) -> Option<&FieldDecl> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Type identity of a record plus a way to obtain its schema.
///
/// This is the descriptor cache key. Two shapes compare equal iff they
/// describe the same Rust type.
#[derive(Clone, Copy)]
pub struct Shape {
    id: TypeId,
    type_name: &'static str,
    schema: fn() -> Schema,
}

impl Shape {
    pub fn of<T: Record>() -> Self {
        Self::new::<T>(T::schema)
    }

    /// Shape for `T` with an explicit schema function.
    pub fn new<T: 'static>(schema: fn() -> Schema) -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            schema,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn schema(&self) -> Schema {
        (self.schema)()
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({})", self.type_name)
    }
}
