//! Basic graph construction and queries example.
//!
//! This example demonstrates:
//! - Creating a new ModuleGraph
//! - Registering modules by URL and backing file
//! - Recording imports and hot-update declarations
//! - Querying importers and the File→Modules index

use fob_graph::ModuleGraph;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let graph = ModuleGraph::new();
    let mut store = graph.write();

    let main = store.ensure_entry_from_url("/src/main.ts", Some(Path::new("/app/src/main.ts")))?;
    let app = store.ensure_entry_from_url("/src/App.tsx", Some(Path::new("/app/src/App.tsx")))?;
    let style = store.ensure_entry_from_url(
        "/src/app.css?direct",
        Some(Path::new("/app/src/app.css")),
    )?;
    let inline_style =
        store.ensure_entry_from_url("/src/app.css?inline", Some(Path::new("/app/src/app.css")))?;

    // main imports App and the stylesheet, and accepts App's updates
    store.update_module_info(main, [app, style], [app], false)?;
    // App pulls the stylesheet in as a string and accepts itself
    store.update_module_info(app, [inline_style], [], true)?;

    println!("Modules:");
    for (idx, node) in store.iter() {
        println!(
            "  {idx} {} [{}]{}",
            node.url,
            node.kind,
            if node.is_self_accepting() { " self-accepting" } else { "" }
        );
    }

    println!("\nImporters of App.tsx:");
    for &importer in store[app].importers() {
        println!("  - {}", store[importer].url);
    }

    println!("\nModules backed by app.css:");
    for idx in store.modules_by_file(Path::new("/app/src/app.css")) {
        println!("  - {} ({})", store[idx].url, store[idx].kind);
    }

    println!("\nEntry modules:");
    for (_, node) in store.iter().filter(|(_, node)| node.is_root()) {
        println!("  - {}", node.url);
    }

    Ok(())
}
