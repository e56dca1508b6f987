//! Plugin `handle_hot_update` hooks.
//!
//! Hooks run in registration order before any invalidation happens. Each
//! one sees the current affected-module list and may replace it; the next
//! hook sees the replacement. Returning `None` leaves the list untouched.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use fob_graph::{ModuleGraph, ModuleIdx};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::HookError;
use crate::reader::SourceReader;

/// Snapshot handed to every hook for one file-change event.
#[derive(Debug)]
pub struct HmrContext<'a> {
    /// Absolute path of the changed file.
    pub file: &'a Path,
    /// Timestamp stamped on every module invalidated by this event.
    pub timestamp: u64,
    /// Modules currently considered affected.
    pub modules: Vec<ModuleIdx>,
    /// The module graph, for hooks that need to look modules up.
    pub graph: &'a ModuleGraph,
    reader: &'a dyn SourceReader,
    content: OnceCell<String>,
}

impl<'a> HmrContext<'a> {
    pub fn new(
        file: &'a Path,
        timestamp: u64,
        modules: Vec<ModuleIdx>,
        graph: &'a ModuleGraph,
        reader: &'a dyn SourceReader,
    ) -> Self {
        Self {
            file,
            timestamp,
            modules,
            graph,
            reader,
            content: OnceCell::new(),
        }
    }

    /// Contents of the changed file. Read on first call, then memoized.
    pub async fn read(&self) -> Result<&str, HookError> {
        let content = self
            .content
            .get_or_try_init(|| async {
                self.reader
                    .read_source(self.file)
                    .await
                    .map_err(|source| HookError::Read {
                        path: self.file.to_path_buf(),
                        source,
                    })
            })
            .await?;
        Ok(content.as_str())
    }

    /// Consume the context, yielding the final affected-module list.
    pub fn into_modules(self) -> Vec<ModuleIdx> {
        self.modules
    }
}

/// Capability implemented by plugins that customize hot updates.
#[async_trait]
pub trait HotUpdateHook: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Return `Some(modules)` to replace the affected-module list.
    async fn handle_hot_update(
        &self,
        ctx: &HmrContext<'_>,
    ) -> Result<Option<Vec<ModuleIdx>>, HookError>;
}

/// Ordered list of hooks.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn HotUpdateHook>>,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hook: Arc<dyn HotUpdateHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in order. The first error aborts the chain.
    pub async fn run(&self, ctx: &mut HmrContext<'_>) -> Result<(), HookError> {
        for hook in &self.hooks {
            if let Some(modules) = hook.handle_hot_update(ctx).await? {
                debug!(
                    hook = hook.name(),
                    before = ctx.modules.len(),
                    after = modules.len(),
                    "hook replaced affected modules"
                );
                ctx.modules = modules;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}
