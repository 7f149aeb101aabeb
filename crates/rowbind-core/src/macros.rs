//! `record!`: declare a target structure together with its schema.
//!
//! ```
//! use rowbind_core::record;
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Audit {
//!         #[column("created_by")] pub created_by: String,
//!     }
//! }
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Person {
//!         #[embed] pub audit: Audit,
//!         #[column("name")] pub name: String,
//!         #[column("age")] pub age: i64,
//!         pub cached: bool,
//!     }
//! }
//! ```
//!
//! Field markers:
//! - `#[column("ext")]`: receives column `ext` through the field's address.
//! - `#[scanner("ext")]`: receives column `ext`; the field type implements `Scanner`.
//! - `#[embed]`: the field's record type is flattened at this position.
//! - no marker: never a column.
//!
//! Doc comments and any other field attributes are kept on the generated
//! struct; markers are stripped. When a field carries several markers the
//! first one wins.
//!
//! Only `pub` fields receive columns. A trailing `post_scan = path;` registers
//! a `fn(&mut Self) -> Result<(), BoxError>` hook run after single-row scans.

#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($fattr:tt)*])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
        $(post_scan = $hook:path;)?
    ) => {
        $crate::__rowbind_struct! {
            @fields { $(#[$meta])* $vis struct $name } [] []
            $( ( [ $( [$($fattr)*] )* ] ( $fvis $field : $fty ) ) )*
        }

        impl $crate::Record for $name {
            fn schema() -> $crate::Schema {
                $crate::Schema::new(
                    ::std::any::type_name::<$name>(),
                    ::std::vec![
                        $(
                            $crate::__rowbind_field_decl!(
                                $field,
                                !stringify!($fvis).is_empty(),
                                $fty;
                                $( [$($fattr)*] )*
                            ),
                        )*
                    ],
                )
            }

            fn shape(&self) -> $crate::Shape {
                $crate::Shape::of::<$name>()
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<$crate::FieldMut<'_>> {
                ::std::vec![
                    $( $crate::__rowbind_field_mut!(self.$field; $( [$($fattr)*] )*), )*
                ]
            }
        }

        impl $crate::ScanInto for $name {
            fn resolve(&mut self) -> $crate::Target<'_> {
                $crate::Target::Record(self)
            }

            fn post_scan(&mut self) -> ::std::result::Result<(), $crate::BoxError> {
                $crate::__rowbind_post_scan!(self $(, $hook)?)
            }
        }
    };
}

// Emits the struct one field at a time: markers are dropped, every other
// attribute is collected in `[$keep]` and written ahead of the field.
#[doc(hidden)]
#[macro_export]
macro_rules! __rowbind_struct {
    (@fields { $($header:tt)* } [$($out:tt)*] [$($keep:tt)*]
        ( [] ( $($body:tt)* ) ) $($rest:tt)*
    ) => {
        $crate::__rowbind_struct! {
            @fields { $($header)* } [$($out)* $($keep)* $($body)*,] [] $($rest)*
        }
    };
    (@fields { $($header:tt)* } [$($out:tt)*] [$($keep:tt)*]
        ( [[column $($_m:tt)*] $($attrs:tt)*] $body:tt ) $($rest:tt)*
    ) => {
        $crate::__rowbind_struct! {
            @fields { $($header)* } [$($out)*] [$($keep)*] ( [$($attrs)*] $body ) $($rest)*
        }
    };
    (@fields { $($header:tt)* } [$($out:tt)*] [$($keep:tt)*]
        ( [[scanner $($_m:tt)*] $($attrs:tt)*] $body:tt ) $($rest:tt)*
    ) => {
        $crate::__rowbind_struct! {
            @fields { $($header)* } [$($out)*] [$($keep)*] ( [$($attrs)*] $body ) $($rest)*
        }
    };
    (@fields { $($header:tt)* } [$($out:tt)*] [$($keep:tt)*]
        ( [[embed] $($attrs:tt)*] $body:tt ) $($rest:tt)*
    ) => {
        $crate::__rowbind_struct! {
            @fields { $($header)* } [$($out)*] [$($keep)*] ( [$($attrs)*] $body ) $($rest)*
        }
    };
    (@fields { $($header:tt)* } [$($out:tt)*] [$($keep:tt)*]
        ( [[$($attr:tt)*] $($attrs:tt)*] $body:tt ) $($rest:tt)*
    ) => {
        $crate::__rowbind_struct! {
            @fields { $($header)* } [$($out)*] [$($keep)* #[$($attr)*]]
            ( [$($attrs)*] $body ) $($rest)*
        }
    };
    (@fields { $($header:tt)* } [$($out:tt)*] []) => {
        $($header)* {
            $($out)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __rowbind_field_decl {
    ($field:ident, $exported:expr, $fty:ty; ) => {
        $crate::FieldDecl::opaque(stringify!($field), $exported)
    };
    ($field:ident, $exported:expr, $fty:ty; [column ($ext:literal)] $($rest:tt)*) => {
        $crate::FieldDecl::column(stringify!($field), $ext, $exported, false)
    };
    ($field:ident, $exported:expr, $fty:ty; [scanner ($ext:literal)] $($rest:tt)*) => {
        $crate::FieldDecl::column(stringify!($field), $ext, $exported, true)
    };
    ($field:ident, $exported:expr, $fty:ty; [embed] $($rest:tt)*) => {
        $crate::FieldDecl::embedded(stringify!($field), $exported, $crate::Shape::of::<$fty>())
    };
    ($field:ident, $exported:expr, $fty:ty; [$($other:tt)*] $($rest:tt)*) => {
        $crate::__rowbind_field_decl!($field, $exported, $fty; $($rest)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __rowbind_field_mut {
    ($place:expr; ) => {
        $crate::FieldMut::Opaque
    };
    ($place:expr; [column ($ext:literal)] $($rest:tt)*) => {
        $crate::FieldMut::Plain(&mut $place)
    };
    ($place:expr; [scanner ($ext:literal)] $($rest:tt)*) => {
        $crate::FieldMut::Scanner(&mut $place)
    };
    ($place:expr; [embed] $($rest:tt)*) => {
        $crate::FieldMut::Embedded(&mut $place)
    };
    ($place:expr; [$($other:tt)*] $($rest:tt)*) => {
        $crate::__rowbind_field_mut!($place; $($rest)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __rowbind_post_scan {
    ($this:expr) => {
        ::std::result::Result::Ok(())
    };
    ($this:expr, $hook:path) => {
        $hook($this)
    };
}
