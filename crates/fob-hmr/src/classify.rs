//! Path classification for file-change events.
//!
//! Decides, from the path alone, whether a change is handled outside the
//! module graph (server restart, client runtime reload) or needs a graph
//! lookup.

use std::path::{Component, Path};

use crate::config::HmrConfig;
use crate::payload::RELOAD_ALL;

/// What a changed path means before the graph is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// The active configuration file.
    Config,
    /// A file the configuration was loaded from.
    ConfigDependency,
    /// An environment file, with env-file handling enabled.
    Env,
    /// A file of the injected client runtime.
    ClientRuntime,
    /// Anything else; look it up in the module graph.
    Source,
}

impl PathClass {
    /// Changes that can only be applied by restarting the server.
    pub fn requires_restart(self) -> bool {
        matches!(
            self,
            PathClass::Config | PathClass::ConfigDependency | PathClass::Env
        )
    }
}

/// Classify an absolute, normalized path. First match wins.
pub fn classify_path(config: &HmrConfig, file: &Path) -> PathClass {
    if config.resolved_config_file().as_deref() == Some(file) {
        return PathClass::Config;
    }
    if config.resolved_config_dependencies().any(|dep| dep == file) {
        return PathClass::ConfigDependency;
    }
    if config.env_file && is_env_file(file) {
        return PathClass::Env;
    }
    if file.starts_with(config.resolved_client_dir()) {
        return PathClass::ClientRuntime;
    }
    PathClass::Source
}

/// `.env` or `.env.<mode>[.local]`.
pub fn is_env_file(file: &Path) -> bool {
    file.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == ".env" || name.starts_with(".env."))
}

/// HTML documents cannot be hot patched.
pub fn is_html_file(file: &Path) -> bool {
    file.extension().is_some_and(|ext| ext == "html")
}

/// `file` relative to `root` with forward slashes, or the full path when it
/// lives outside the root.
pub fn short_name(file: &Path, root: &Path) -> String {
    match file.strip_prefix(root) {
        Ok(relative) => to_slash(relative),
        Err(_) => file.display().to_string(),
    }
}

/// Reload path for an HTML document that has no module in the graph.
pub fn html_reload_path(config: &HmrConfig, file: &Path) -> String {
    if config.middleware_mode {
        RELOAD_ALL.to_string()
    } else {
        format!("/{}", short_name(file, &config.root))
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
