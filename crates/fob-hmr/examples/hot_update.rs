//! Hot update walkthrough.
//!
//! This example demonstrates:
//! - Wiring an HmrEngine to a ClientRegistry
//! - A partial update through a self-accepting component
//! - A full reload when the change reaches an entry module
//! - Feeding watcher events through `run`

use fob_graph::ModuleGraph;
use fob_hmr::{ClientRegistry, FileChange, HmrConfig, HmrEngine, logger::init_logger};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger(true, false, false);

    let root = Path::new("/app");
    let graph = ModuleGraph::new();
    {
        let mut store = graph.write();
        let main = store.ensure_entry_from_url("/src/main.ts", Some(root.join("src/main.ts").as_path()))?;
        let app = store.ensure_entry_from_url("/src/App.tsx", Some(root.join("src/App.tsx").as_path()))?;
        let button =
            store.ensure_entry_from_url("/src/Button.tsx", Some(root.join("src/Button.tsx").as_path()))?;

        store.update_module_info(main, [app], [], false)?;
        store.update_module_info(app, [button], [], true)?;
    }

    let clients = Arc::new(ClientRegistry::new());
    let (_id, mut messages) = clients.register_client();

    let engine = HmrEngine::builder(HmrConfig::new(root), graph, clients.clone()).build();

    let (tx, rx) = mpsc::channel(16);
    for file in ["src/Button.tsx", "src/main.ts"] {
        tx.send(FileChange::Modified(root.join(file))).await?;
    }
    tx.send(FileChange::Created(PathBuf::from("/app/index.html")))
        .await?;
    drop(tx);

    engine.run(rx).await;

    while let Ok(json) = messages.try_recv() {
        println!("client <- {json}");
    }

    Ok(())
}
