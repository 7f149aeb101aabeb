#![forbid(unsafe_code)]
//! rowbind: populate Rust structs from result-set rows by column name.
//!
//! Declare targets with [`record!`], hand them to [`scan`] (one row) or
//! [`scan_array`] (all rows) together with any row source, and columns are
//! routed to fields by their tags. Unknown columns are discarded; fields with
//! no column are left as they were.
//!
//! ```
//! use rowbind::{record, scan, MemoryRows, IterableScannable, Value};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Person {
//!         #[column("name")] pub name: String,
//!         #[column("age")] pub age: i64,
//!     }
//! }
//!
//! let mut rows = MemoryRows::new(
//!     ["age", "extra", "name"],
//!     vec![vec![Value::from("30"), Value::from("x"), Value::from("Bob")]],
//! );
//! assert!(rows.advance());
//!
//! let mut person = Person::default();
//! scan(&mut rows, &mut [&mut person]).unwrap();
//! assert_eq!(person.name, "Bob");
//! assert_eq!(person.age, 30);
//! ```

pub use rowbind_core::*;
pub use rowbind_io::{assign, scan_row, CsvRows, FromValue, IoError, MemoryRows, Table, ValueRow};
pub use rowbind_map::*;

pub mod prelude {
    pub use rowbind_core::prelude::*;
    pub use rowbind_io::{CsvRows, MemoryRows, ValueRow};
    pub use rowbind_map::{
        post_scan, quick_scan, scan, scan_array, scan_with_fields, scan_with_map, ScanIntoArray,
        ScanMap,
    };
}
