//! Arena storage for the module graph.
//!
//! Nodes live in a flat `Vec` addressed by [`ModuleIdx`]; edges are index
//! sets on each node. Cyclic imports are therefore plain data and never
//! ownership cycles.

use std::ops::{Index, IndexMut};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap as HashMap;
use tracing::trace;

use crate::error::{GraphError, Result};
use crate::node::{ModuleIdx, ModuleNode, ModuleSet};

/// All modules seen during the current server session.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<ModuleNode>,
    url_to_module: HashMap<String, ModuleIdx>,
    file_to_modules: HashMap<PathBuf, ModuleSet>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modules in the store.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by index, if it belongs to this store.
    pub fn get(&self, idx: ModuleIdx) -> Option<&ModuleNode> {
        self.nodes.get(idx.index())
    }

    pub fn get_mut(&mut self, idx: ModuleIdx) -> Option<&mut ModuleNode> {
        self.nodes.get_mut(idx.index())
    }

    /// Iterate over every node with its index.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleIdx, &ModuleNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (ModuleIdx::from_usize(i), node))
    }

    /// Look up a module by its URL.
    pub fn module_by_url(&self, url: &str) -> Option<ModuleIdx> {
        self.url_to_module.get(url).copied()
    }

    /// All modules backed by `file`, in creation order.
    ///
    /// A single file can back several modules, for instance when it is
    /// requested with different queries.
    pub fn modules_by_file(&self, file: &Path) -> Vec<ModuleIdx> {
        self.file_to_modules
            .get(file)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Get the module for `url`, creating it on first resolution.
    ///
    /// If the module already exists without a backing file and `file` is
    /// provided, the file is recorded and indexed.
    pub fn ensure_entry_from_url(&mut self, url: &str, file: Option<&Path>) -> Result<ModuleIdx> {
        if url.is_empty() {
            return Err(GraphError::EmptyUrl);
        }

        if let Some(idx) = self.module_by_url(url) {
            if let Some(file) = file {
                if self.nodes[idx.index()].file.is_none() {
                    self.nodes[idx.index()].file = Some(file.to_path_buf());
                    self.index_file(file, idx);
                }
            }
            return Ok(idx);
        }

        let idx = ModuleIdx::try_from_usize(self.nodes.len())
            .ok_or(GraphError::TooManyModules(self.nodes.len()))?;
        self.nodes
            .push(ModuleNode::new(url.to_string(), file.map(Path::to_path_buf)));
        self.url_to_module.insert(url.to_string(), idx);
        if let Some(file) = file {
            self.index_file(file, idx);
        }

        trace!(%idx, url, "created module node");
        Ok(idx)
    }

    fn index_file(&mut self, file: &Path, idx: ModuleIdx) {
        self.file_to_modules
            .entry(file.to_path_buf())
            .or_default()
            .insert(idx);
    }

    fn check(&self, idx: ModuleIdx) -> Result<()> {
        if idx.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownModule(idx))
        }
    }

    /// Record that `importer` imports `imported`, keeping both edge
    /// directions in sync.
    pub fn add_import(&mut self, importer: ModuleIdx, imported: ModuleIdx) -> Result<()> {
        self.check(importer)?;
        self.check(imported)?;

        self.nodes[importer.index()].imported_modules.insert(imported);
        self.nodes[imported.index()].importers.insert(importer);
        Ok(())
    }

    /// Mark `importer` as accepting hot updates of `dep`.
    ///
    /// `dep` must already be imported by `importer`.
    pub fn accept_dep(&mut self, importer: ModuleIdx, dep: ModuleIdx) -> Result<()> {
        self.check(importer)?;
        self.check(dep)?;

        let node = &mut self.nodes[importer.index()];
        if !node.imported_modules.contains(&dep) {
            return Err(GraphError::NotImported { importer, dep });
        }
        node.accepted_hmr_deps.insert(dep);
        Ok(())
    }

    pub fn set_self_accepting(&mut self, idx: ModuleIdx, self_accepting: bool) -> Result<()> {
        self.check(idx)?;
        self.nodes[idx.index()].is_self_accepting = self_accepting;
        Ok(())
    }

    /// Replace the import analysis results of a module.
    ///
    /// Importer sets of both new and dropped imports are updated. Returns the
    /// dropped imports that have no importers left.
    pub fn update_module_info<I, A>(
        &mut self,
        idx: ModuleIdx,
        imported: I,
        accepted: A,
        is_self_accepting: bool,
    ) -> Result<Vec<ModuleIdx>>
    where
        I: IntoIterator<Item = ModuleIdx>,
        A: IntoIterator<Item = ModuleIdx>,
    {
        self.check(idx)?;
        let next_imports: ModuleSet = imported.into_iter().collect();
        let next_accepted: ModuleSet = accepted.into_iter().collect();

        for &dep in next_imports.iter().chain(next_accepted.iter()) {
            self.check(dep)?;
        }
        if let Some(&dep) = next_accepted.iter().find(|dep| !next_imports.contains(*dep)) {
            return Err(GraphError::NotImported { importer: idx, dep });
        }

        let prev_imports = std::mem::take(&mut self.nodes[idx.index()].imported_modules);

        for &dep in &next_imports {
            self.nodes[dep.index()].importers.insert(idx);
        }

        let mut no_longer_imported = Vec::new();
        for dep in prev_imports {
            if next_imports.contains(&dep) {
                continue;
            }
            let dep_node = &mut self.nodes[dep.index()];
            dep_node.importers.shift_remove(&idx);
            if dep_node.importers.is_empty() {
                no_longer_imported.push(dep);
            }
        }

        let node = &mut self.nodes[idx.index()];
        node.imported_modules = next_imports;
        node.accepted_hmr_deps = next_accepted;
        node.is_self_accepting = is_self_accepting;

        self.debug_assert_symmetric();
        Ok(no_longer_imported)
    }

    /// Clear the cached transform artifacts of one module.
    pub fn invalidate_module(&mut self, idx: ModuleIdx) {
        if let Some(node) = self.get_mut(idx) {
            node.clear_cached_artifacts();
        }
    }

    /// Clear cached artifacts for every module backed by `file`.
    pub fn on_file_change(&mut self, file: &Path) {
        for idx in self.modules_by_file(file) {
            self.invalidate_module(idx);
        }
    }

    /// Clear cached artifacts on every module.
    pub fn invalidate_all(&mut self) {
        for node in &mut self.nodes {
            node.clear_cached_artifacts();
        }
    }

    /// Assert `b ∈ a.imported_modules ⇔ a ∈ b.importers` for every edge.
    ///
    /// Compiled out of release builds.
    pub fn debug_assert_symmetric(&self) {
        if cfg!(debug_assertions) {
            for (idx, node) in self.iter() {
                for &dep in &node.imported_modules {
                    debug_assert!(
                        self.nodes[dep.index()].importers.contains(&idx),
                        "{} imports {} but is missing from its importers",
                        node.url,
                        self.nodes[dep.index()].url
                    );
                }
                for &importer in &node.importers {
                    debug_assert!(
                        self.nodes[importer.index()].imported_modules.contains(&idx),
                        "{} lists importer {} which does not import it",
                        node.url,
                        self.nodes[importer.index()].url
                    );
                }
            }
        }
    }
}

impl Index<ModuleIdx> for GraphStore {
    type Output = ModuleNode;

    fn index(&self, idx: ModuleIdx) -> &ModuleNode {
        &self.nodes[idx.index()]
    }
}

impl IndexMut<ModuleIdx> for GraphStore {
    fn index_mut(&mut self, idx: ModuleIdx) -> &mut ModuleNode {
        &mut self.nodes[idx.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_entry_is_idempotent() {
        let mut store = GraphStore::new();
        let a = store.ensure_entry_from_url("/src/a.js", None).unwrap();
        let again = store
            .ensure_entry_from_url("/src/a.js", Some(Path::new("/p/src/a.js")))
            .unwrap();

        assert_eq!(a, again);
        assert_eq!(store.len(), 1);
        assert_eq!(store.modules_by_file(Path::new("/p/src/a.js")), vec![a]);
    }

    #[test]
    fn test_empty_url_rejected() {
        let mut store = GraphStore::new();
        assert_eq!(
            store.ensure_entry_from_url("", None),
            Err(GraphError::EmptyUrl)
        );
    }

    #[test]
    fn test_one_file_backs_many_modules() {
        let mut store = GraphStore::new();
        let file = Path::new("/p/src/style.css");
        let a = store.ensure_entry_from_url("/src/style.css", Some(file)).unwrap();
        let b = store
            .ensure_entry_from_url("/src/style.css?direct", Some(file))
            .unwrap();

        assert_eq!(store.modules_by_file(file), vec![a, b]);
        assert!(store.modules_by_file(Path::new("/p/missing.css")).is_empty());
    }

    #[test]
    fn test_accept_requires_import() {
        let mut store = GraphStore::new();
        let a = store.ensure_entry_from_url("/a.js", None).unwrap();
        let b = store.ensure_entry_from_url("/b.js", None).unwrap();

        assert_eq!(
            store.accept_dep(a, b),
            Err(GraphError::NotImported { importer: a, dep: b })
        );

        store.add_import(a, b).unwrap();
        store.accept_dep(a, b).unwrap();
        assert!(store[a].accepts(b));
    }

    #[test]
    fn test_update_module_info_reports_orphans() {
        let mut store = GraphStore::new();
        let a = store.ensure_entry_from_url("/a.js", None).unwrap();
        let b = store.ensure_entry_from_url("/b.js", None).unwrap();
        let c = store.ensure_entry_from_url("/c.js", None).unwrap();
        let d = store.ensure_entry_from_url("/d.js", None).unwrap();

        store.update_module_info(a, [b, c], [b], false).unwrap();
        store.update_module_info(d, [c], [], true).unwrap();
        assert!(store[b].importers().contains(&a));
        assert!(store[a].accepts(b));

        let orphans = store.update_module_info(a, [c], [], false).unwrap();
        assert_eq!(orphans, vec![b]);
        assert!(store[b].is_root());
        assert!(!store[a].accepts(b));
        assert_eq!(store[c].importers().len(), 2);
        assert!(store[d].is_self_accepting());
    }

    #[test]
    fn test_update_module_info_rejects_foreign_accept() {
        let mut store = GraphStore::new();
        let a = store.ensure_entry_from_url("/a.js", None).unwrap();
        let b = store.ensure_entry_from_url("/b.js", None).unwrap();

        let err = store.update_module_info(a, [], [b], false).unwrap_err();
        assert_eq!(err, GraphError::NotImported { importer: a, dep: b });
        assert!(store[a].imported_modules().is_empty());
    }

    #[test]
    fn test_unknown_module() {
        let mut store = GraphStore::new();
        let a = store.ensure_entry_from_url("/a.js", None).unwrap();
        let foreign = ModuleIdx::from_usize(42);
        assert_eq!(
            store.add_import(a, foreign),
            Err(GraphError::UnknownModule(foreign))
        );
    }

    #[test]
    fn test_on_file_change_clears_only_that_file() {
        use crate::node::TransformResult;
        use std::sync::Arc;

        let mut store = GraphStore::new();
        let a = store
            .ensure_entry_from_url("/a.js", Some(Path::new("/p/a.js")))
            .unwrap();
        let b = store
            .ensure_entry_from_url("/b.js", Some(Path::new("/p/b.js")))
            .unwrap();
        for idx in [a, b] {
            store[idx].transform_result = Some(Arc::new(TransformResult::new("x")));
        }

        store.on_file_change(Path::new("/p/a.js"));
        assert!(!store[a].has_cached_artifacts());
        assert!(store[b].has_cached_artifacts());

        store.invalidate_all();
        assert!(!store[b].has_cached_artifacts());
    }
}
