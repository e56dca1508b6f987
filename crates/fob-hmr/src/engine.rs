//! File-change handling.
//!
//! [`HmrEngine`] owns everything one dev-server session needs to react to
//! watcher events: configuration, the shared module graph, the hook chain,
//! the client channel and the glob-importer table. Events are handled one at
//! a time; a second event waits until the first has sent its payload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use fob_graph::{ModuleGraph, ModuleIdx};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, warn};

use crate::channel::HmrChannel;
use crate::classify::{PathClass, classify_path, html_reload_path, is_html_file, short_name};
use crate::config::HmrConfig;
use crate::dispatch::update_modules;
use crate::error::Result;
use crate::glob::GlobImporters;
use crate::hook::{HmrContext, HookChain, HotUpdateHook};
use crate::payload::{HmrPayload, RELOAD_ALL};
use crate::reader::{FsReader, SourceReader};
use crate::report;

/// Restarts the dev server. Implemented by the embedding server.
#[async_trait]
pub trait ServerControl: Send + Sync {
    async fn restart(&self) -> Result<()>;
}

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Decision taken for one file-change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HmrAction {
    /// Delegated to [`ServerControl`]; nothing was sent to clients.
    RestartServer,
    /// Clients were told to reload `path` (`"*"` for every page).
    FullReload { path: String },
    /// The file is not part of the module graph.
    Noop,
    /// The listed modules were dispatched. The payload may still be a full
    /// reload if propagation hit a dead end.
    Propagate { modules: Vec<ModuleIdx> },
}

/// An action together with the payload actually sent, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmrOutcome {
    pub action: HmrAction,
    pub payload: Option<HmrPayload>,
}

impl HmrOutcome {
    fn silent(action: HmrAction) -> Self {
        Self {
            action,
            payload: None,
        }
    }
}

/// Hot update engine for one dev-server session.
pub struct HmrEngine {
    config: HmrConfig,
    graph: ModuleGraph,
    hooks: HookChain,
    channel: Arc<dyn HmrChannel>,
    reader: Arc<dyn SourceReader>,
    server: Option<Arc<dyn ServerControl>>,
    glob_importers: GlobImporters,
    /// Held for the whole handling of one event.
    event_gate: Mutex<()>,
}

impl HmrEngine {
    pub fn builder(
        config: HmrConfig,
        graph: ModuleGraph,
        channel: Arc<dyn HmrChannel>,
    ) -> HmrEngineBuilder {
        HmrEngineBuilder {
            config,
            graph,
            channel,
            hooks: HookChain::new(),
            reader: None,
            server: None,
        }
    }

    pub fn config(&self) -> &HmrConfig {
        &self.config
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn glob_importers(&self) -> &GlobImporters {
        &self.glob_importers
    }

    /// Handle a content change of `file`.
    pub async fn handle_hmr_update(&self, file: &Path) -> Result<HmrOutcome> {
        let _gate = self.event_gate.lock().await;
        self.process_change(file).await
    }

    /// Handle any watcher event. Creations and removals go through the same
    /// path as modifications; a removal also forgets the file's glob imports.
    pub async fn handle_file_change(&self, change: &FileChange) -> Result<HmrOutcome> {
        let _gate = self.event_gate.lock().await;
        if let FileChange::Removed(path) = change {
            self.forget_glob_importer(path);
        }
        self.process_change(change.path()).await
    }

    /// Lightweight add/unlink handling: dispatch the modules backed by
    /// `file`, if any, without path classification or hooks.
    pub async fn handle_file_add_unlink(&self, file: &Path, is_unlink: bool) -> Option<HmrPayload> {
        let _gate = self.event_gate.lock().await;
        let file = path_clean::clean(file);
        if is_unlink {
            self.forget_glob_importer(&file);
        }

        let mut store = self.graph.write();
        let modules = store.modules_by_file(&file);
        if modules.is_empty() {
            return None;
        }

        let short = short_name(&file, &self.config.root);
        Some(update_modules(
            &mut store,
            &short,
            &modules,
            now_millis(),
            self.channel.as_ref(),
        ))
    }

    /// Process events in arrival order until the sender side closes.
    ///
    /// Errors are logged and do not stop the loop.
    pub async fn run(&self, mut rx: mpsc::Receiver<FileChange>) {
        while let Some(change) = rx.recv().await {
            if let Err(err) = self.handle_file_change(&change).await {
                error!(file = %change.path().display(), error = %err, "hot update failed");
            }
        }
        debug!("file change channel closed");
    }

    fn forget_glob_importer(&self, file: &Path) {
        let file = path_clean::clean(file);
        if self.glob_importers.remove(&file).is_some() {
            debug!(file = %file.display(), "removed glob importer");
        }
    }

    async fn process_change(&self, file: &Path) -> Result<HmrOutcome> {
        let file = path_clean::clean(file);
        let short = short_name(&file, &self.config.root);

        let class = classify_path(&self.config, &file);
        if class.requires_restart() {
            debug!(file = %short, "[config change]");
            report::restarting(&short);
            match &self.server {
                Some(server) => server.restart().await?,
                None => warn!("no server control registered, restart skipped"),
            }
            return Ok(HmrOutcome::silent(HmrAction::RestartServer));
        }

        debug!(file = %short, "[file change]");

        if class == PathClass::ClientRuntime {
            let payload = HmrPayload::full_reload();
            self.channel.send(&payload);
            return Ok(HmrOutcome {
                action: HmrAction::FullReload {
                    path: RELOAD_ALL.to_string(),
                },
                payload: Some(payload),
            });
        }

        let timestamp = now_millis();
        let modules = self.graph.read().modules_by_file(&file);

        let mut ctx = HmrContext::new(&file, timestamp, modules, &self.graph, self.reader.as_ref());
        self.hooks.run(&mut ctx).await?;
        let mut modules = ctx.into_modules();
        {
            let store = self.graph.read();
            modules.retain(|&idx| {
                let known = store.get(idx).is_some();
                if !known {
                    warn!(module = %idx, "hook returned a module that is not in the graph");
                }
                known
            });
        }

        if modules.is_empty() {
            if is_html_file(&file) {
                let path = html_reload_path(&self.config, &file);
                report::page_reload(&short);
                let payload = HmrPayload::page_reload(path.clone());
                self.channel.send(&payload);
                return Ok(HmrOutcome {
                    action: HmrAction::FullReload { path },
                    payload: Some(payload),
                });
            }
            debug!(file = %short, "[no modules matched]");
            return Ok(HmrOutcome::silent(HmrAction::Noop));
        }

        let payload = update_modules(
            &mut self.graph.write(),
            &short,
            &modules,
            timestamp,
            self.channel.as_ref(),
        );

        Ok(HmrOutcome {
            action: HmrAction::Propagate { modules },
            payload: Some(payload),
        })
    }
}

impl std::fmt::Debug for HmrEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmrEngine")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("glob_importers", &self.glob_importers.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`HmrEngine`].
pub struct HmrEngineBuilder {
    config: HmrConfig,
    graph: ModuleGraph,
    channel: Arc<dyn HmrChannel>,
    hooks: HookChain,
    reader: Option<Arc<dyn SourceReader>>,
    server: Option<Arc<dyn ServerControl>>,
}

impl HmrEngineBuilder {
    /// Append a hot update hook. Hooks run in the order they are added.
    pub fn hook(mut self, hook: Arc<dyn HotUpdateHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Replace the file reader used by [`HmrContext::read`].
    pub fn reader(mut self, reader: Arc<dyn SourceReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn server(mut self, server: Arc<dyn ServerControl>) -> Self {
        self.server = Some(server);
        self
    }

    pub fn build(self) -> HmrEngine {
        HmrEngine {
            config: self.config,
            graph: self.graph,
            hooks: self.hooks,
            channel: self.channel,
            reader: self.reader.unwrap_or_else(|| Arc::new(FsReader)),
            server: self.server,
            glob_importers: GlobImporters::new(),
            event_gate: Mutex::new(()),
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
