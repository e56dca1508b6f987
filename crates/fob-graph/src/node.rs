use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

use crate::request::{is_css_request, is_direct_css_request};

/// Insertion-ordered set of module indices.
///
/// Edge sets keep insertion order so graph walks (and therefore the update
/// records they produce) are deterministic for a given graph state.
pub type ModuleSet = IndexSet<ModuleIdx, FxBuildHasher>;

/// Arena index of a module node inside a [`GraphStore`](crate::GraphStore).
///
/// Indices are only meaningful for the store that created them. Nodes are
/// never removed during a session, so an index stays valid for the lifetime
/// of its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIdx(u32);

impl ModuleIdx {
    /// Index for arena position `index`, or `None` past `u32::MAX`.
    pub(crate) fn try_from_usize(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Index for a position already known to be in the arena.
    pub(crate) fn from_usize(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "module index {index} overflows u32");
        Self(index as u32)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the client applies an update whose boundary is this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Script module, re-imported by the client runtime.
    Js,
    /// Stylesheet requested directly, swapped in place by the client runtime.
    Css,
}

impl ModuleKind {
    /// Classify a module by its URL.
    pub fn from_url(url: &str) -> Self {
        if is_direct_css_request(url) {
            ModuleKind::Css
        } else {
            ModuleKind::Js
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Js => "js",
            ModuleKind::Css => "css",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memoized output of the transform pipeline for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResult {
    pub code: String,
    pub map: Option<String>,
    pub etag: Option<String>,
}

impl TransformResult {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            map: None,
            etag: None,
        }
    }
}

/// Instantiated server-side module, kept opaque to the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsrModule(pub serde_json::Value);

/// One resolved module URL within a server session.
///
/// Edge sets are owned by the [`GraphStore`](crate::GraphStore), which keeps
/// `importers` and `imported_modules` symmetric; they are read-only here.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    /// Browser-visible URL, the stable lookup key.
    pub url: String,
    /// Backing file on disk; `None` for virtual modules.
    pub file: Option<PathBuf>,
    pub kind: ModuleKind,
    pub(crate) importers: ModuleSet,
    pub(crate) imported_modules: ModuleSet,
    pub(crate) accepted_hmr_deps: ModuleSet,
    pub(crate) is_self_accepting: bool,
    pub last_hmr_timestamp: u64,
    pub transform_result: Option<Arc<TransformResult>>,
    pub ssr_module: Option<Arc<SsrModule>>,
    pub ssr_transform_result: Option<Arc<TransformResult>>,
}

impl ModuleNode {
    pub(crate) fn new(url: String, file: Option<PathBuf>) -> Self {
        let kind = ModuleKind::from_url(&url);
        Self {
            url,
            file,
            kind,
            importers: ModuleSet::default(),
            imported_modules: ModuleSet::default(),
            accepted_hmr_deps: ModuleSet::default(),
            is_self_accepting: false,
            last_hmr_timestamp: 0,
            transform_result: None,
            ssr_module: None,
            ssr_transform_result: None,
        }
    }

    /// Modules that import this one. Empty for entry modules.
    pub fn importers(&self) -> &ModuleSet {
        &self.importers
    }

    /// Modules this one imports.
    pub fn imported_modules(&self) -> &ModuleSet {
        &self.imported_modules
    }

    /// Dependencies whose updates this module accepts explicitly.
    pub fn accepted_hmr_deps(&self) -> &ModuleSet {
        &self.accepted_hmr_deps
    }

    /// Whether the module can apply its own replacement.
    pub fn is_self_accepting(&self) -> bool {
        self.is_self_accepting
    }

    /// Whether this module accepts updates of `dep`.
    pub fn accepts(&self, dep: ModuleIdx) -> bool {
        self.accepted_hmr_deps.contains(&dep)
    }

    /// Whether the module is a stylesheet for propagation purposes.
    pub fn is_css(&self) -> bool {
        is_css_request(&self.url)
    }

    /// Whether the module has no importers.
    pub fn is_root(&self) -> bool {
        self.importers.is_empty()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Drop every memoized transform artifact so the pipeline recomputes on
    /// the next request.
    pub fn clear_cached_artifacts(&mut self) {
        self.transform_result = None;
        self.ssr_module = None;
        self.ssr_transform_result = None;
    }

    pub fn has_cached_artifacts(&self) -> bool {
        self.transform_result.is_some()
            || self.ssr_module.is_some()
            || self.ssr_transform_result.is_some()
    }
}
