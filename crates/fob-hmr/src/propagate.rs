//! Update boundary search.
//!
//! Starting at a changed module, walk up through importers until every path
//! ends at a module that can accept the update: either a self-accepting
//! module or an importer that accepts this specific dependency. A path that
//! reaches an entry module, or loops back into itself, without finding such
//! a module is a dead end and forces a full reload.

use fob_graph::{GraphStore, ModuleIdx};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

/// A module that will receive the update, and the module whose new version
/// it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    pub boundary: ModuleIdx,
    pub accepted_via: ModuleIdx,
}

/// Boundaries of one dispatch, deduplicated by `(boundary, accepted_via)`.
pub type BoundarySet = IndexSet<Boundary, FxBuildHasher>;

/// Outcome of walking up from one changed module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Propagation {
    /// Every path ended at a boundary.
    Bounded,
    /// Some path cannot be hot updated.
    DeadEnd,
}

impl Propagation {
    pub fn is_dead_end(self) -> bool {
        self == Propagation::DeadEnd
    }
}

/// Collect the boundaries for a change to `idx` into `boundaries`.
///
/// Reads the graph only; the caller must keep it from changing during the
/// walk. Boundaries found before a dead end is detected stay in the set.
pub fn propagate_update(
    store: &GraphStore,
    idx: ModuleIdx,
    boundaries: &mut BoundarySet,
) -> Propagation {
    let mut chain = vec![idx];
    propagate(store, idx, boundaries, &mut chain)
}

fn propagate(
    store: &GraphStore,
    idx: ModuleIdx,
    boundaries: &mut BoundarySet,
    chain: &mut Vec<ModuleIdx>,
) -> Propagation {
    let node = &store[idx];

    if node.is_self_accepting() {
        boundaries.insert(Boundary {
            boundary: idx,
            accepted_via: idx,
        });

        // A PostCSS plugin (Tailwind JIT and friends) can register any file
        // as a dependency of a stylesheet, so CSS importers must still hear
        // about the change.
        for &importer in node.importers() {
            if store[importer].is_css() && !chain.contains(&importer) {
                chain.push(importer);
                let _ = propagate(store, importer, boundaries, chain);
                chain.pop();
            }
        }

        return Propagation::Bounded;
    }

    if node.is_root() {
        return Propagation::DeadEnd;
    }

    // A non-CSS file whose only importers are stylesheets was attached by a
    // CSS tool; those stylesheets are not real update boundaries for it.
    if !node.is_css() && node.importers().iter().all(|&i| store[i].is_css()) {
        return Propagation::DeadEnd;
    }

    for &importer in node.importers() {
        if store[importer].accepts(idx) {
            boundaries.insert(Boundary {
                boundary: importer,
                accepted_via: idx,
            });
            continue;
        }

        if chain.contains(&importer) {
            // circular imports with no accepting edge
            return Propagation::DeadEnd;
        }

        chain.push(importer);
        let result = propagate(store, importer, boundaries, chain);
        chain.pop();
        if result.is_dead_end() {
            return Propagation::DeadEnd;
        }
    }

    Propagation::Bounded
}
