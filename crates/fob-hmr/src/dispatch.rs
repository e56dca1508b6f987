//! Turn a batch of changed modules into exactly one client message.

use fob_graph::{GraphStore, ModuleIdx};
use rustc_hash::FxHashSet as HashSet;
use tracing::debug;

use crate::channel::HmrChannel;
use crate::invalidate::invalidate;
use crate::payload::{HmrPayload, Update};
use crate::propagate::{BoundarySet, propagate_update};
use crate::report;

/// Invalidate every module in `modules`, compute update boundaries, and
/// send the resulting payload on `channel`.
///
/// Invalidation always covers the whole batch. Boundary search stops at the
/// first dead end, which turns the batch into an unscoped full reload.
/// `display_name` only appears in the reload notification.
pub fn update_modules(
    store: &mut GraphStore,
    display_name: &str,
    modules: &[ModuleIdx],
    timestamp: u64,
    channel: &dyn HmrChannel,
) -> HmrPayload {
    let mut seen = HashSet::default();
    let mut boundaries = BoundarySet::default();
    let mut needs_full_reload = false;

    for &idx in modules {
        let visited = invalidate(store, idx, timestamp, &mut seen);
        debug!(module = %store[idx].url, visited, "invalidated");

        if needs_full_reload {
            continue;
        }
        if propagate_update(store, idx, &mut boundaries).is_dead_end() {
            debug!(module = %store[idx].url, "update propagation hit a dead end");
            needs_full_reload = true;
        }
    }

    let payload = if needs_full_reload {
        report::page_reload(display_name);
        HmrPayload::full_reload()
    } else {
        let updates = boundaries
            .iter()
            .map(|entry| {
                let boundary = &store[entry.boundary];
                Update {
                    kind: boundary.kind.into(),
                    timestamp,
                    path: boundary.url.clone(),
                    accepted_path: store[entry.accepted_via].url.clone(),
                }
            })
            .collect::<Vec<_>>();
        report::hmr_updates(&updates);
        HmrPayload::Update { updates }
    };

    channel.send(&payload);
    payload
}
