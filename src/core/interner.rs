//! Identity interning for value tuples.
//!
//! The interner deduplicates equal values into a single shared allocation, so
//! equality checks downstream can be pointer comparisons and the indices never
//! store the same tuple twice. Thread-safe: concurrent document passes intern
//! through the same instance.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashSet;

/// Get-or-insert cache keyed by the value itself.
///
/// Interning a value returns an `Arc<T>` that can be cheaply cloned. If an
/// equal value was already interned, the existing `Arc` is returned, so equal
/// values are identity-equal (`Arc::ptr_eq`).
#[derive(Debug, Default)]
pub struct Interner<T: Eq + Hash> {
    values: DashSet<Arc<T>>,
}

impl<T: Eq + Hash> Interner<T> {
    pub fn new() -> Self {
        Self {
            values: DashSet::new(),
        }
    }

    /// Intern a value, returning the canonical shared instance.
    pub fn intern(&self, value: T) -> Arc<T> {
        if let Some(existing) = self.values.get(&value) {
            return Arc::clone(existing.key());
        }
        let arc = Arc::new(value);
        // Two threads may race to insert the same tuple; the loser re-reads
        // so both end up holding the canonical instance.
        if self.values.insert(Arc::clone(&arc)) {
            arc
        } else {
            self.values
                .get(arc.as_ref())
                .map(|e| Arc::clone(e.key()))
                .unwrap_or(arc)
        }
    }

    /// Get the canonical instance if the value was already interned.
    pub fn get(&self, value: &T) -> Option<Arc<T>> {
        self.values.get(value).map(|e| Arc::clone(e.key()))
    }

    /// Number of unique values interned.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values have been interned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_returns_same_arc() {
        let interner: Interner<String> = Interner::new();
        let a = interner.intern("hello".to_string());
        let b = interner.intern("hello".to_string());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_intern_different_values() {
        let interner: Interner<String> = Interner::new();
        let a = interner.intern("hello".to_string());
        let b = interner.intern("world".to_string());
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(&*a, "hello");
        assert_eq!(&*b, "world");
    }

    #[test]
    fn test_get_existing() {
        let interner: Interner<String> = Interner::new();
        let canonical = interner.intern("exists".to_string());
        let looked_up = interner.get(&"exists".to_string());
        assert!(looked_up.is_some_and(|v| Arc::ptr_eq(&v, &canonical)));
        assert!(interner.get(&"missing".to_string()).is_none());
    }

    #[test]
    fn test_concurrent_interning_yields_one_instance() {
        let interner: Arc<Interner<u64>> = Arc::new(Interner::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || (0..100).map(|n| interner.intern(n)).collect::<Vec<_>>())
            })
            .collect();
        let results: Vec<Vec<Arc<u64>>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(interner.len(), 100);
        for per_thread in &results[1..] {
            for (a, b) in results[0].iter().zip(per_thread) {
                assert!(Arc::ptr_eq(a, b));
            }
        }
    }
}
