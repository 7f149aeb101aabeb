#![forbid(unsafe_code)]
//! rowbind-map: the mapping engine.
//!
//! A scan resolves each target to a cached `Descriptor`, renders it against
//! the live instance into a `NamedFields` list, matches that list against the
//! source's column names to get a `ScanMap`, and hands the routed handles to
//! the row source. `scan_array` repeats the last two steps per row, reusing
//! one map and rolling back the tail element on failure.

pub mod cache;
pub mod descriptor;
pub mod exec;
pub mod fields;
pub mod grow;
pub mod matcher;

pub use cache::DescriptorCache;
pub use descriptor::{Descriptor, DescriptorEntry};
pub use exec::{post_scan, quick_scan, scan, scan_with_fields, scan_with_map, scan_with_mapped_fields};
pub use fields::{build_named_fields, get_fields_from, record_fields, record_fields_with, render};
pub use grow::{scan_array, ScanIntoArray};
pub use matcher::{build_map, build_map_with, match_columns, ScanMap};
