#![forbid(unsafe_code)]
//! rowbind-core: values, record schemas, and the capability traits shared by
//! the mapping engine (`rowbind-map`) and row sources (`rowbind-io`).
//!
//! Nothing here touches a row source or caches anything; this crate only
//! defines what targets and sources look like.

pub mod config;
pub mod error;
pub mod handle;
mod macros;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod source;
pub mod value;

pub use config::{MatchStrategy, ScanConfig};
pub use error::{BoxError, Error, Result};
pub use handle::{Handle, NamedFields, Scanner};
pub use record::{FieldMut, ListFields, Record, ScanInto, Target};
pub use schema::{FieldDecl, FieldKind, Schema, Shape};
pub use source::{wrap_basic, AdvancedScannable, BasicRows, IterableScannable, Scannable};
pub use value::Value;
