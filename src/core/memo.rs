//! Lazy memoization cell used for per-document derived artifacts.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

/// A clearable once-cell that computes its value on first access.
///
/// Reads after the first computation are lock-light (a shared `RwLock` read).
/// Computation is serialized through a dedicated mutex with a second check
/// inside, so concurrent first readers run the closure once and all observe
/// the same `Arc`.
#[derive(Debug, Default)]
pub struct Memo<T> {
    value: RwLock<Option<Arc<T>>>,
    compute_lock: Mutex<()>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            compute_lock: Mutex::new(()),
        }
    }

    /// Return the cached value, computing it with `f` if absent.
    pub fn get_or_compute(&self, f: impl FnOnce() -> T) -> Arc<T> {
        if let Some(cached) = self.value.read().as_ref() {
            return Arc::clone(cached);
        }
        let _guard = self.compute_lock.lock();
        // Another thread may have computed while we waited on the lock.
        if let Some(cached) = self.value.read().as_ref() {
            return Arc::clone(cached);
        }
        let computed = Arc::new(f());
        *self.value.write() = Some(Arc::clone(&computed));
        computed
    }

    /// Return the cached value without computing.
    pub fn get(&self) -> Option<Arc<T>> {
        self.value.read().as_ref().map(Arc::clone)
    }

    /// Drop the cached value; the next access recomputes.
    pub fn clear(&self) {
        *self.value.write() = None;
    }

    /// Returns true if a value is currently cached.
    pub fn is_computed(&self) -> bool {
        self.value.read().is_some()
    }
}
