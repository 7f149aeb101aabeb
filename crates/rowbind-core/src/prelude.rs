//! Convenient re-exports for downstream crates.

pub use crate::config::{MatchStrategy, ScanConfig};
pub use crate::error::{BoxError, Error, Result};
pub use crate::handle::{Handle, NamedFields, Scanner};
pub use crate::record;
pub use crate::record::{FieldMut, ListFields, Record, ScanInto, Target};
pub use crate::schema::{FieldDecl, FieldKind, Schema, Shape};
pub use crate::source::{wrap_basic, AdvancedScannable, IterableScannable, Scannable};
pub use crate::value::Value;
