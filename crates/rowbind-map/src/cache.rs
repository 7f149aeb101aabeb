//! Process-wide descriptor cache keyed by record type identity.
//!
//! Lookups take the read lock. A miss re-checks under the write lock before
//! building, so a type is normally built once; entries are never evicted.
//! Only shape metadata is retained, never caller values.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use rowbind_core::error::Result;
use rowbind_core::schema::Shape;

use crate::descriptor::Descriptor;

static GLOBAL: Lazy<DescriptorCache> = Lazy::new(DescriptorCache::new);

#[derive(Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<TypeId, Arc<Descriptor>>>,
    builds: AtomicUsize,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    /// The cache shared by every scan in the process.
    pub fn global() -> &'static DescriptorCache {
        &GLOBAL
    }

    /// Return the descriptor for `shape`, building and storing it on first use.
    ///
    /// Failed builds are not stored; the next call retries.
    pub fn resolve(&self, shape: &Shape) -> Result<Arc<Descriptor>> {
        if let Some(found) = self.get(shape.id()) {
            return Ok(found);
        }

        // A panic while holding the lock cannot leave a half-written entry,
        // so a poisoned map is still consistent.
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = entries.get(&shape.id()) {
            return Ok(Arc::clone(found));
        }

        let built = Arc::new(Descriptor::build(shape)?);
        self.builds.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            type_name = shape.type_name(),
            fields = built.len(),
            "built descriptor"
        );
        entries.insert(shape.id(), Arc::clone(&built));
        Ok(built)
    }

    pub fn get(&self, id: TypeId) -> Option<Arc<Descriptor>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of descriptors built by this cache so far (advisory).
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbind_core::record;
    use std::thread;

    record! {
        #[derive(Debug, Default)]
        pub struct Cached {
            #[column("a")] pub a: String,
            #[column("b")] pub b: String,
        }
    }

    #[test]
    fn test_resolve_populates_once() {
        let cache = DescriptorCache::new();
        let shape = Shape::of::<Cached>();
        assert!(!cache.contains(shape.id()));

        let first = cache.resolve(&shape).unwrap();
        let second = cache.resolve(&shape).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn test_concurrent_first_use() {
        let cache = Arc::new(DescriptorCache::new());
        let shape = Shape::of::<Cached>();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.resolve(&shape).unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results {
            assert_eq!(**r, *results[0]);
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.builds() >= 1);
    }
}
