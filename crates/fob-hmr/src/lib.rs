//! # fob-hmr
//!
//! Hot update propagation for the fob development server.
//!
//! When the file watcher reports a change, the engine decides what the
//! browser has to do about it:
//!
//! 1. **Classify** the path. Configuration and `.env` changes restart the
//!    server; changes to the client runtime reload every page.
//! 2. **Look up** the modules backed by the file and let plugin hooks adjust
//!    that list.
//! 3. **Invalidate** the cached transforms of those modules and of every
//!    importer that does not accept them.
//! 4. **Propagate** upward to the modules that accept the change, or give up
//!    and ask for a full reload.
//! 5. **Send** exactly one payload to connected clients.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use fob_graph::ModuleGraph;
//! use fob_hmr::{ClientRegistry, HmrConfig, HmrEngine};
//!
//! # async fn demo() -> fob_hmr::Result<()> {
//! let graph = ModuleGraph::new();
//! let clients = Arc::new(ClientRegistry::new());
//! let (_id, mut messages) = clients.register_client();
//!
//! let engine = HmrEngine::builder(HmrConfig::load("/app")?, graph.clone(), clients).build();
//! engine.handle_hmr_update(Path::new("/app/src/App.tsx")).await?;
//!
//! if let Some(json) = messages.recv().await {
//!     println!("{json}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod glob;
pub mod hook;
pub mod invalidate;
pub mod logger;
pub mod payload;
pub mod propagate;
pub mod reader;
mod report;

pub use channel::{ClientRegistry, HmrChannel};
pub use classify::{PathClass, classify_path};
pub use config::HmrConfig;
pub use dispatch::update_modules;
pub use engine::{FileChange, HmrAction, HmrEngine, HmrEngineBuilder, HmrOutcome, ServerControl};
pub use error::{ConfigError, HmrError, HookError, Result};
pub use glob::{GlobImport, GlobImporters};
pub use hook::{HmrContext, HookChain, HotUpdateHook};
pub use invalidate::invalidate;
pub use payload::{HmrPayload, Update, UpdateKind};
pub use propagate::{Boundary, BoundarySet, Propagation, propagate_update};
pub use reader::{FsReader, SourceReader};
