//! Thread-safe concurrent access example.
//!
//! This example demonstrates:
//! - Sharing a ModuleGraph across threads (clones share one store)
//! - Request handlers reading the graph concurrently
//! - A resolver thread re-analysing a module under the write guard

use fob_graph::ModuleGraph;
use std::path::Path;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let graph = ModuleGraph::new();

    let urls = ["/src/index.ts", "/src/utils.ts", "/src/api.ts", "/src/components.ts"];
    let ids = {
        let mut store = graph.write();
        let ids = urls
            .iter()
            .map(|url| {
                let file = format!("/app{url}");
                store.ensure_entry_from_url(url, Some(Path::new(&file)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        store.update_module_info(ids[0], [ids[1], ids[2]], [], false)?;
        store.update_module_info(ids[2], [ids[1]], [ids[1]], false)?;
        store.update_module_info(ids[3], [ids[1]], [], true)?;
        ids
    };

    let mut handles = vec![];

    // Readers: what a request handler looks up while serving modules
    for (n, &idx) in ids.iter().enumerate() {
        let graph = graph.clone();
        handles.push(thread::spawn(move || {
            let store = graph.read();
            let importers = store[idx].importers().len();
            println!("Reader {n}: {} has {importers} importers", store[idx].url);
            importers
        }));
    }

    // Writer: the resolver drops components.ts -> utils.ts
    let writer_graph = graph.clone();
    let components = ids[3];
    handles.push(thread::spawn(move || {
        let mut store = writer_graph.write();
        let dropped = store
            .update_module_info(components, [], [], true)
            .map(|dropped| dropped.len())
            .unwrap_or_default();
        println!("Writer: components.ts re-analysed, {dropped} modules no longer imported");
        dropped
    }));

    let mut results = vec![];
    for handle in handles {
        results.push(handle.join().map_err(|_| "thread panicked")?);
    }

    println!("\nAll threads completed successfully!");
    println!("Results: {:?}", results);

    let store = graph.read();
    println!("\nFinal graph:");
    println!("  Modules: {}", store.len());
    println!(
        "  Entry modules: {}",
        store.iter().filter(|(_, node)| node.is_root()).count()
    );

    Ok(())
}
