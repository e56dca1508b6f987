//! Modules that import files through glob patterns.
//!
//! The resolver registers a module here when it expands an
//! `import.meta.glob` call. The table is keyed by the importing module's
//! file, so removing that file drops its entry.

use std::path::{Path, PathBuf};

use fob_graph::ModuleIdx;
use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

/// One glob-importing module and the patterns it expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobImport {
    pub module: ModuleIdx,
    pub patterns: Vec<String>,
}

/// Shared glob-importer table.
#[derive(Debug, Default)]
pub struct GlobImporters {
    entries: RwLock<HashMap<PathBuf, GlobImport>>,
}

impl GlobImporters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the globs expanded by the module backed by `file`.
    pub fn insert(&self, file: impl Into<PathBuf>, import: GlobImport) {
        self.entries.write().insert(file.into(), import);
    }

    /// Drop the entry for `file`, returning it if one existed.
    pub fn remove(&self, file: &Path) -> Option<GlobImport> {
        self.entries.write().remove(file)
    }

    pub fn get(&self, file: &Path) -> Option<GlobImport> {
        self.entries.read().get(file).cloned()
    }

    pub fn contains(&self, file: &Path) -> bool {
        self.entries.read().contains_key(file)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
