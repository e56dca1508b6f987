//! # fob-graph
//!
//! The live module graph of the development server.
//!
//! Every module the dev server resolves during a session becomes a
//! [`ModuleNode`] keyed by its browser-visible URL. Nodes record who imports
//! them, what they import, and the hot-update declarations found by import
//! analysis (`import.meta.hot.accept()`). The hot update engine (`fob-hmr`)
//! walks this graph to decide which modules must be invalidated and which can
//! absorb a change without a page reload.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ ModuleGraph  (Arc<RwLock<GraphStore>>)        │
//! └───────────────────────┬──────────────────────┘
//!                         │
//!          ┌──────────────┼───────────────┐
//!          ▼              ▼               ▼
//!   url → ModuleIdx   Vec<ModuleNode>   file → {ModuleIdx}
//!                         │
//!                         ▼
//!        importers / imported_modules / accepted_hmr_deps
//!                   (index sets, no ownership)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fob_graph::ModuleGraph;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), fob_graph::GraphError> {
//! let graph = ModuleGraph::new();
//! let mut store = graph.write();
//!
//! let main = store.ensure_entry_from_url("/src/main.ts", Some(Path::new("/app/src/main.ts")))?;
//! let app = store.ensure_entry_from_url("/src/App.tsx", Some(Path::new("/app/src/App.tsx")))?;
//!
//! // main.ts imports App.tsx and accepts its updates
//! store.update_module_info(main, [app], [app], false)?;
//!
//! assert!(store[app].importers().contains(&main));
//! assert!(store[main].accepts(app));
//! # Ok(())
//! # }
//! ```
//!
//! ## Ownership
//!
//! The store owns every node. Edges are [`ModuleIdx`] sets, so import cycles
//! never create ownership cycles. Nodes are never removed during a session;
//! a node nobody imports any more simply stops being reachable.

mod error;
mod graph;
mod node;
pub mod request;
mod store;

pub use error::{GraphError, Result};
pub use graph::ModuleGraph;
pub use node::{ModuleIdx, ModuleKind, ModuleNode, ModuleSet, SsrModule, TransformResult};
pub use store::GraphStore;

#[cfg(test)]
mod tests;
