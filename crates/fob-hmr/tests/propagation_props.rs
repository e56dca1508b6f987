//! Property-based tests for invalidation and boundary propagation.

use fob_graph::{GraphStore, ModuleIdx};
use fob_hmr::{
    BoundarySet, HmrChannel, HmrPayload, Propagation, invalidate, propagate_update, update_modules,
};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

struct Discard;

impl HmrChannel for Discard {
    fn send(&self, _payload: &HmrPayload) {}
}

/// Random graph description: per module, its imports, which of those it
/// accepts, and whether it accepts itself.
#[derive(Debug, Clone)]
struct Shape {
    imports: Vec<Vec<usize>>,
    accepts: Vec<Vec<bool>>,
    self_accepting: Vec<bool>,
}

fn shape_strategy(acyclic: bool) -> impl Strategy<Value = Shape> {
    (2usize..=10).prop_flat_map(move |n| {
        (
            prop::collection::vec(prop::collection::vec((0..n, any::<bool>()), 0..=3), n),
            prop::collection::vec(prop::bool::weighted(0.2), n),
        )
            .prop_map(move |(edges, self_accepting)| {
                let mut imports = Vec::with_capacity(n);
                let mut accepts = Vec::with_capacity(n);
                for (from, list) in edges.into_iter().enumerate() {
                    let (deps, flags): (Vec<_>, Vec<_>) = list
                        .into_iter()
                        // An acyclic graph only imports higher-numbered modules.
                        .filter(|&(to, _)| !acyclic || to > from)
                        .unzip();
                    imports.push(deps);
                    accepts.push(flags);
                }
                Shape {
                    imports,
                    accepts,
                    self_accepting,
                }
            })
    })
}

fn build(shape: &Shape) -> (GraphStore, Vec<ModuleIdx>) {
    let mut store = GraphStore::new();
    let ids: Vec<_> = (0..shape.imports.len())
        .map(|i| {
            let url = if i % 4 == 3 {
                format!("/src/s{i}.css?direct")
            } else {
                format!("/src/m{i}.ts")
            };
            store.ensure_entry_from_url(&url, None).unwrap()
        })
        .collect();

    for (from, deps) in shape.imports.iter().enumerate() {
        let imported: Vec<_> = deps.iter().map(|&d| ids[d]).collect();
        let accepted: Vec<_> = deps
            .iter()
            .zip(&shape.accepts[from])
            .filter(|&(_, &flag)| flag)
            .map(|(&d, _)| ids[d])
            .collect();
        store
            .update_module_info(ids[from], imported, accepted, shape.self_accepting[from])
            .unwrap();
    }
    (store, ids)
}

fn records(payload: &HmrPayload) -> Option<Vec<(String, String)>> {
    match payload {
        HmrPayload::FullReload { .. } => None,
        HmrPayload::Update { updates } => Some(
            updates
                .iter()
                .map(|u| (u.path.clone(), u.accepted_path.clone()))
                .collect(),
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: in an acyclic graph, a changed entry that does not accept
    /// itself always forces a full reload.
    #[test]
    fn prop_unaccepted_entry_is_dead_end(shape in shape_strategy(true)) {
        let (mut store, ids) = build(&shape);

        for &idx in &ids {
            if store[idx].is_root() && !store[idx].is_self_accepting() {
                let mut boundaries = BoundarySet::default();
                prop_assert_eq!(
                    propagate_update(&store, idx, &mut boundaries),
                    Propagation::DeadEnd
                );
                let payload = update_modules(&mut store, "entry", &[idx], 1, &Discard);
                prop_assert!(payload.is_full_reload());
            }
        }
    }

    /// Property: self-accepting modules never report a dead end.
    #[test]
    fn prop_self_accepting_never_dead_end(shape in shape_strategy(false)) {
        let (store, ids) = build(&shape);

        for &idx in ids.iter().filter(|&&idx| store[idx].is_self_accepting()) {
            let mut boundaries = BoundarySet::default();
            prop_assert_eq!(
                propagate_update(&store, idx, &mut boundaries),
                Propagation::Bounded
            );
            let own = boundaries
                .iter()
                .any(|b| b.boundary == idx && b.accepted_via == idx);
            prop_assert!(own);
        }
    }

    /// Property: one dispatch visits every module at most once.
    #[test]
    fn prop_invalidation_visits_each_module_once(
        shape in shape_strategy(false),
        changed in prop::collection::vec(0usize..10, 1..=6),
    ) {
        let (mut store, ids) = build(&shape);
        let mut seen = FxHashSet::default();
        let mut total = 0;

        for i in changed.into_iter().filter(|&i| i < ids.len()) {
            total += invalidate(&mut store, ids[i], 3, &mut seen);
        }

        prop_assert_eq!(total, seen.len());
        prop_assert!(total <= ids.len());
        for &idx in &seen {
            prop_assert_eq!(store[idx].last_hmr_timestamp, 3);
        }
    }

    /// Property: a cycle with no accepting edge is a dead end; letting one
    /// member accept its import turns it into an update at that member.
    #[test]
    fn prop_cycle_needs_accepting_member(len in 2usize..=8, acceptor in 0usize..8) {
        let acceptor = acceptor % len;
        let mut store = GraphStore::new();
        let ids: Vec<_> = (0..len)
            .map(|i| store.ensure_entry_from_url(&format!("/c{i}.ts"), None).unwrap())
            .collect();
        for i in 0..len {
            store.add_import(ids[i], ids[(i + 1) % len]).unwrap();
        }

        let payload = update_modules(&mut store, "c0.ts", &[ids[0]], 1, &Discard);
        prop_assert!(payload.is_full_reload());

        let next = ids[(acceptor + 1) % len];
        store.accept_dep(ids[acceptor], next).unwrap();

        let payload = update_modules(&mut store, "c0.ts", &[ids[0]], 2, &Discard);
        prop_assert_eq!(
            records(&payload),
            Some(vec![(store[ids[acceptor]].url.clone(), store[next].url.clone())])
        );
    }

    /// Property: dispatching the same change twice yields the same records.
    #[test]
    fn prop_dispatch_is_idempotent(
        shape in shape_strategy(false),
        changed in prop::collection::vec(0usize..10, 1..=4),
    ) {
        let (mut store, ids) = build(&shape);
        let modules: Vec<_> = changed
            .into_iter()
            .filter(|&i| i < ids.len())
            .map(|i| ids[i])
            .collect();

        let first = update_modules(&mut store, "x", &modules, 10, &Discard);
        let second = update_modules(&mut store, "x", &modules, 20, &Discard);

        prop_assert_eq!(first.is_full_reload(), second.is_full_reload());
        prop_assert_eq!(records(&first), records(&second));
    }
}
