use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::GraphStore;

/// Shared handle to the session's module graph.
///
/// Cloning is cheap; all clones point at the same [`GraphStore`]. The resolver
/// and request handlers take short read or write guards, while a hot update
/// dispatch holds the write guard for its whole duration so no other writer
/// observes a half-invalidated graph.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    inner: Arc<RwLock<GraphStore>>,
}

impl ModuleGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already populated store.
    pub fn from_store(store: GraphStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Acquire shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, GraphStore> {
        self.inner.read()
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, GraphStore> {
        self.inner.write()
    }
}
