//! Field materializer: resolves targets and renders their descriptors into
//! a runtime field list of (external name, handle) pairs.

use rowbind_core::error::{Error, Result};
use rowbind_core::handle::{Handle, NamedFields};
use rowbind_core::record::{FieldMut, Record, ScanInto, Target};

use crate::cache::DescriptorCache;
use crate::descriptor::{Descriptor, DescriptorEntry};

/// Build the runtime field list for one target.
///
/// Overrides are used verbatim. Records go through the global descriptor
/// cache. Anything else is rejected as an incompatible object type.
pub fn get_fields_from<'a, T>(target: &'a mut T) -> Result<NamedFields<'a>>
where
    T: ScanInto + ?Sized,
{
    match target.resolve() {
        Target::Override(custom) => custom.list_fields().map_err(Error::Override),
        Target::Record(record) => record_fields(record),
        Target::Unusable(kind) => Err(Error::incompatible(kind)),
    }
}

/// Concatenate the field lists of every target, preserving input order.
pub fn build_named_fields<'a, 'b>(
    into: &'a mut [&'b mut dyn ScanInto],
) -> Result<NamedFields<'a>> {
    if into.is_empty() {
        return Err(Error::Arity("empty output object list".into()));
    }

    let mut fields = NamedFields::new();
    for target in into.iter_mut() {
        fields.append(get_fields_from(&mut **target)?);
    }
    Ok(fields)
}

/// Field list for a record, using the global descriptor cache.
pub fn record_fields(record: &mut dyn Record) -> Result<NamedFields<'_>> {
    record_fields_with(DescriptorCache::global(), record)
}

pub fn record_fields_with<'a>(
    cache: &DescriptorCache,
    record: &'a mut dyn Record,
) -> Result<NamedFields<'a>> {
    let descriptor = cache.resolve(&record.shape())?;
    render(&descriptor, record)
}

/// Render `descriptor` against a live instance of the type it describes.
///
/// Only fails when the instance does not lay out the fields its schema
/// declares (a hand-written `Record` impl out of sync with its schema).
pub fn render<'a>(descriptor: &Descriptor, record: &'a mut dyn Record) -> Result<NamedFields<'a>> {
    let mut out = NamedFields::with_capacity(descriptor.len());
    render_level(descriptor, descriptor.entries(), 0, record, &mut out)?;
    Ok(out)
}

// `entries` share the path prefix `[..depth]`; an embedded record's entries
// are contiguous, so each run with the same `path[depth]` is one field.
fn render_level<'a>(
    descriptor: &Descriptor,
    entries: &[DescriptorEntry],
    depth: usize,
    record: &'a mut dyn Record,
    out: &mut NamedFields<'a>,
) -> Result<()> {
    let mut slots: Vec<Option<FieldMut<'a>>> = record.fields_mut().into_iter().map(Some).collect();

    let mut start = 0;
    while start < entries.len() {
        let head = entries[start].path[depth];
        let end = start
            + entries[start..]
                .iter()
                .take_while(|e| e.path[depth] == head)
                .count();
        let group = &entries[start..end];

        let slot = slots
            .get_mut(head)
            .and_then(Option::take)
            .ok_or_else(|| mismatch(descriptor, head))?;

        match (slot, group) {
            (FieldMut::Plain(field), [entry])
                if entry.path.len() == depth + 1 && !entry.self_scanning =>
            {
                out.push(entry.name.clone(), Handle::Field(field));
            }
            (FieldMut::Scanner(field), [entry])
                if entry.path.len() == depth + 1 && entry.self_scanning =>
            {
                out.push(entry.name.clone(), Handle::Scanner(field));
            }
            (FieldMut::Embedded(inner), _) if group.iter().all(|e| e.path.len() > depth + 1) => {
                render_level(descriptor, group, depth + 1, inner, out)?;
            }
            _ => return Err(mismatch(descriptor, head)),
        }

        start = end;
    }

    Ok(())
}

fn mismatch(descriptor: &Descriptor, index: usize) -> Error {
    Error::Structural(format!(
        "instance of {} does not match its descriptor at field {}",
        descriptor.type_name(),
        index
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbind_core::error::BoxError;
    use rowbind_core::record::ListFields;
    use rowbind_core::schema::{FieldDecl, Schema, Shape};
    use rowbind_core::{record, Value};

    record! {
        #[derive(Debug, Default)]
        pub struct Base {
            #[column("id")] pub id: i64,
        }
    }

    record! {
        #[derive(Debug, Default)]
        pub struct Item {
            #[embed] pub base: Base,
            #[column("name")] pub name: String,
            #[scanner("raw")] pub raw: Value,
        }
    }

    #[derive(Default)]
    struct Custom {
        a: String,
        b: String,
    }

    impl ListFields for Custom {
        fn list_fields(&mut self) -> std::result::Result<NamedFields<'_>, BoxError> {
            let mut fields = NamedFields::new();
            fields.push("testing1", Handle::field(&mut self.a));
            fields.push("testing2", Handle::field(&mut self.b));
            Ok(fields)
        }
    }

    impl ScanInto for Custom {
        fn resolve(&mut self) -> Target<'_> {
            Target::Override(self)
        }
    }

    #[test]
    fn test_get_fields_from_record() {
        let mut item = Item::default();
        let mut fields = get_fields_from(&mut item).unwrap();
        assert_eq!(fields.names(), &["id", "name", "raw"]);
        assert_eq!(fields.handles[0].kind(), "field");
        assert_eq!(fields.handles[2].kind(), "scanner");

        *fields.handles[0].downcast_mut::<i64>().unwrap() = 7;
        *fields.handles[1].downcast_mut::<String>().unwrap() = "widget".into();
        drop(fields);
        assert_eq!(item.base.id, 7);
        assert_eq!(item.name, "widget");
    }

    #[test]
    fn test_get_fields_from_override() {
        let mut custom = Custom::default();
        let fields = get_fields_from(&mut custom).unwrap();
        assert_eq!(fields.names(), &["testing1", "testing2"]);
    }

    #[test]
    fn test_get_fields_from_rejects_non_records() {
        let mut x = 10i64;
        let err = get_fields_from(&mut x).unwrap_err();
        assert!(err.to_string().contains("incompatible object type"));

        let mut nothing: Option<Item> = None;
        let err = get_fields_from(&mut nothing).unwrap_err();
        assert!(err.to_string().contains("incompatible object type: nil"));
    }

    #[test]
    fn test_build_named_fields_concatenates() {
        let mut item = Item::default();
        let mut custom = Custom::default();
        let mut targets: [&mut dyn ScanInto; 2] = [&mut item, &mut custom];
        let fields = build_named_fields(&mut targets).unwrap();
        assert_eq!(
            fields.names(),
            &["id", "name", "raw", "testing1", "testing2"]
        );
    }

    #[test]
    fn test_build_named_fields_errors() {
        let err = build_named_fields(&mut []).unwrap_err();
        assert!(matches!(err, Error::Arity(_)));

        let mut item = Item::default();
        let mut x = 5i32;
        let err = build_named_fields(&mut [&mut item, &mut x]).unwrap_err();
        assert!(err.to_string().contains("incompatible object"));
    }

    // Schema says `name` is a column, accessors say it is opaque.
    struct Lying {
        name: String,
    }

    impl Record for Lying {
        fn schema() -> Schema {
            Schema::new("Lying", vec![FieldDecl::column("name", "name", true, false)])
        }

        fn shape(&self) -> Shape {
            Shape::of::<Self>()
        }

        fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
            self.name.clear();
            vec![FieldMut::Opaque]
        }
    }

    #[test]
    fn test_render_detects_layout_mismatch() {
        let mut lying = Lying { name: String::new() };
        let err = record_fields(&mut lying).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }
}
