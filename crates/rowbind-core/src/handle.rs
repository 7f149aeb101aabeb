//! Receivers handed to a row source, and the per-call list that carries them.

use std::any::Any;
use std::fmt;

use crate::error::BoxError;
use crate::value::Value;

/// A field type that absorbs a raw column value itself.
pub trait Scanner {
    fn scan(&mut self, value: Value) -> Result<(), BoxError>;
}

impl Scanner for Value {
    fn scan(&mut self, value: Value) -> Result<(), BoxError> {
        *self = value;
        Ok(())
    }
}

/// One mutable receiver for one column of one row.
pub enum Handle<'a> {
    /// Address of a plain field. The row source decides which concrete
    /// types it knows how to write.
    Field(&'a mut dyn Any),
    /// A self-scanning field; the source passes it the raw value.
    Scanner(&'a mut dyn Scanner),
    /// Accepts and ignores any value.
    Discard,
}

impl<'a> Handle<'a> {
    pub fn field<T: Any>(field: &'a mut T) -> Self {
        Handle::Field(field)
    }

    pub fn scanner<S: Scanner>(scanner: &'a mut S) -> Self {
        Handle::Scanner(scanner)
    }

    pub fn is_discard(&self) -> bool {
        matches!(self, Handle::Discard)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Handle::Field(_) => "field",
            Handle::Scanner(_) => "scanner",
            Handle::Discard => "discard",
        }
    }

    /// Typed view of an address handle; `None` for other handle kinds.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            Handle::Field(f) => f.downcast_mut::<T>(),
            _ => None,
        }
    }

    pub fn as_scanner(&mut self) -> Option<&mut (dyn Scanner + 'a)> {
        match self {
            Handle::Scanner(s) => Some(&mut **s),
            _ => None,
        }
    }
}

impl fmt::Debug for Handle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle::{}", self.kind())
    }
}

/// Runtime field list: external names and handles, index-aligned.
///
/// Built fresh for every concrete instance. Several targets may be
/// concatenated into one list to populate multiple objects from one row.
#[derive(Default)]
pub struct NamedFields<'a> {
    pub names: Vec<String>,
    pub handles: Vec<Handle<'a>>,
}

impl<'a> NamedFields<'a> {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            handles: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            names: Vec::with_capacity(cap),
            handles: Vec::with_capacity(cap),
        }
    }

    /// Add a new handle named `name`.
    pub fn push(&mut self, name: impl Into<String>, handle: Handle<'a>) {
        self.names.push(name.into());
        self.handles.push(handle);
    }

    /// Append all of `other` after the current entries.
    pub fn append(&mut self, other: NamedFields<'a>) {
        self.names.extend(other.names);
        self.handles.extend(other.handles);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn into_handles(self) -> Vec<Handle<'a>> {
        self.handles
    }
}

impl fmt::Debug for NamedFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFields")
            .field("names", &self.names)
            .field("handles", &self.handles)
            .finish()
    }
}
