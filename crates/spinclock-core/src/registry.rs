//! The set of clock instances currently visible on the host.
//!
//! [`InstanceRegistry`] owns the handle-to-colour map and the mutex that
//! guards it. The map itself is never handed out; callers go through
//! [`set`], [`remove`], and [`snapshot`], each of which takes the lock
//! exactly once and releases it before returning.
//!
//! All operations are total. A poisoned lock is recovered rather than
//! propagated: the map holds plain values, so a panic elsewhere cannot
//! leave it half-written.
//!
//! [`set`]: InstanceRegistry::set
//! [`remove`]: InstanceRegistry::remove
//! [`snapshot`]: InstanceRegistry::snapshot

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use spinclock_types::{Colour, InstanceHandle};
use tracing::debug;

/// Guarded mapping from instance handle to its assigned colour.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: Mutex<BTreeMap<InstanceHandle, Colour>>,
}

impl InstanceRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            instances: Mutex::new(BTreeMap::new()),
        }
    }

    /// Insert `handle` with `colour`, or overwrite its colour if present.
    pub fn set(&self, handle: InstanceHandle, colour: Colour) {
        self.lock().insert(handle, colour);
    }

    /// Drop `handle` from the registry. Absent handles are a no-op.
    pub fn remove(&self, handle: &InstanceHandle) {
        let was_active = self.lock().remove(handle).is_some();
        debug!(handle = %handle, was_active, "instance removed");
    }

    /// Copy every active pair out of the registry in one critical section.
    ///
    /// The returned map is independent of the registry: callers may iterate
    /// it at leisure without holding any lock.
    pub fn snapshot(&self) -> BTreeMap<InstanceHandle, Colour> {
        self.lock().clone()
    }

    /// Current colour of `handle`, if it is active.
    pub fn get(&self, handle: &InstanceHandle) -> Option<Colour> {
        self.lock().get(handle).copied()
    }

    /// Number of active instances.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no instance is active.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<InstanceHandle, Colour>> {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
