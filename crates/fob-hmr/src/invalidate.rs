//! Cache invalidation.
//!
//! A change clears the transform caches of the changed module and of every
//! importer that would otherwise keep serving code compiled against the old
//! version. Importers that accept the changed module stop the cascade: they
//! re-fetch the dependency instead of being replaced themselves.

use fob_graph::{GraphStore, ModuleIdx};
use rustc_hash::FxHashSet as HashSet;

/// Stamp `idx` and its non-accepting importers with `timestamp` and clear
/// their cached artifacts.
///
/// `seen` is shared across one dispatch so each module is visited at most
/// once, including in import cycles. Returns the number of modules visited
/// by this call.
pub fn invalidate(
    store: &mut GraphStore,
    idx: ModuleIdx,
    timestamp: u64,
    seen: &mut HashSet<ModuleIdx>,
) -> usize {
    let mut visited = 0;
    let mut stack = vec![idx];

    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        visited += 1;

        let node = &mut store[current];
        node.last_hmr_timestamp = timestamp;
        node.clear_cached_artifacts();

        stack.extend(
            store[current]
                .importers()
                .iter()
                .copied()
                .filter(|&importer| !store[importer].accepts(current)),
        );
    }

    visited
}
