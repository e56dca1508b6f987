//! Smoke tests for fob-graph.
//!
//! Fast, deterministic checks of the graph invariants the hot update engine
//! relies on. Randomized coverage lives in property_tests.rs.

use crate::{GraphStore, ModuleGraph, ModuleIdx, ModuleKind};
use std::path::{Path, PathBuf};

fn add(store: &mut GraphStore, url: &str) -> ModuleIdx {
    let file = PathBuf::from(format!("/project{}", url));
    store
        .ensure_entry_from_url(url, Some(&file))
        .expect("valid url")
}

#[test]
fn test_edge_symmetry_after_mutations() {
    let mut store = GraphStore::new();
    let main = add(&mut store, "/src/main.ts");
    let app = add(&mut store, "/src/App.tsx");
    let util = add(&mut store, "/src/util.ts");

    store.update_module_info(main, [app, util], [app], false).unwrap();
    store.update_module_info(app, [util], [], true).unwrap();
    store.update_module_info(main, [app], [app], false).unwrap();

    for (idx, node) in store.iter() {
        for &dep in node.imported_modules() {
            assert!(store[dep].importers().contains(&idx));
        }
        for &importer in node.importers() {
            assert!(store[importer].imported_modules().contains(&idx));
        }
    }
    assert_eq!(store[util].importers().len(), 1);
}

#[test]
fn test_roots_have_no_importers() {
    let mut store = GraphStore::new();
    let entry = add(&mut store, "/src/main.ts");
    let dep = add(&mut store, "/src/dep.ts");
    store.add_import(entry, dep).unwrap();

    assert!(store[entry].is_root());
    assert!(!store[dep].is_root());
}

#[test]
fn test_cycles_are_plain_data() {
    let mut store = GraphStore::new();
    let a = add(&mut store, "/src/a.ts");
    let b = add(&mut store, "/src/b.ts");
    store.add_import(a, b).unwrap();
    store.add_import(b, a).unwrap();

    assert!(store[a].importers().contains(&b));
    assert!(store[b].importers().contains(&a));
    store.debug_assert_symmetric();
}

#[test]
fn test_css_classification() {
    let mut store = GraphStore::new();
    let imported = add(&mut store, "/src/app.css");
    let linked = store
        .ensure_entry_from_url("/src/app.css?direct", Some(Path::new("/project/src/app.css")))
        .unwrap();
    let script = add(&mut store, "/src/app.ts");

    assert!(store[imported].is_css());
    assert!(store[linked].is_css());
    assert!(!store[script].is_css());
    assert_eq!(store[imported].kind, ModuleKind::Js);
    assert_eq!(store[linked].kind, ModuleKind::Css);
    assert_eq!(
        store.modules_by_file(Path::new("/project/src/app.css")),
        vec![imported, linked]
    );
}

#[test]
fn test_graph_handle_shares_nodes() {
    let graph = ModuleGraph::new();
    let idx = add(&mut graph.write(), "/src/a.ts");
    graph.write()[idx].last_hmr_timestamp = 42;

    assert_eq!(graph.clone().read()[idx].last_hmr_timestamp, 42);
}
