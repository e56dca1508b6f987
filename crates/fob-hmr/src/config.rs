//! Hot update engine configuration.
//!
//! Settings are layered with figment. Priority: explicit overrides >
//! environment variables (`FOB_HMR_*`) > `fob-hmr.toml` in the project root >
//! defaults.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up in the project root by [`HmrConfig::load`].
pub const CONFIG_FILE_NAME: &str = "fob-hmr.toml";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "FOB_HMR_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmrConfig {
    /// Project root. Changed files are displayed relative to it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Active bundler configuration file. Changing it restarts the server.
    #[serde(default)]
    pub config_file: Option<PathBuf>,

    /// Files the configuration file was loaded from (imports of the config).
    #[serde(default)]
    pub config_dependencies: Vec<PathBuf>,

    /// Restart the server when a `.env` file changes.
    #[serde(default = "default_env_file")]
    pub env_file: bool,

    /// Directory holding the client runtime injected into pages.
    #[serde(default = "default_client_dir")]
    pub client_dir: PathBuf,

    /// The dev server runs as middleware of another server; HTML reloads
    /// cannot be scoped to a page URL.
    #[serde(default)]
    pub middleware_mode: bool,
}

impl Default for HmrConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            config_file: None,
            config_dependencies: Vec::new(),
            env_file: default_env_file(),
            client_dir: default_client_dir(),
            middleware_mode: false,
        }
    }
}

impl HmrConfig {
    /// Default configuration for a project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load configuration for `root` from `fob-hmr.toml` (if present) and
    /// `FOB_HMR_*` environment variables.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let file = root.join(CONFIG_FILE_NAME);
        let file = file.exists().then_some(file);
        Self::load_with(root, file.as_deref(), None)
    }

    /// Load configuration from an explicit file, with optional overrides
    /// taking precedence over every other source.
    pub fn load_with(
        root: &Path,
        file: Option<&Path>,
        overrides: Option<&HmrConfig>,
    ) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::new(root)));

        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        if let Some(overrides) = overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Extract(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that paths can be compared against absolute watcher paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.is_absolute() {
            return Err(ConfigError::InvalidValue {
                field: "root".to_string(),
                message: format!("must be an absolute path, got {}", self.root.display()),
            });
        }
        if self.client_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "client_dir".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve a possibly relative path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        path_clean::clean(self.root.join(path))
    }

    /// Absolute path of the client runtime directory.
    pub fn resolved_client_dir(&self) -> PathBuf {
        self.resolve(&self.client_dir)
    }

    /// Absolute path of the configuration file, if any.
    pub fn resolved_config_file(&self) -> Option<PathBuf> {
        self.config_file.as_deref().map(|p| self.resolve(p))
    }

    /// Absolute paths of the configuration file's dependencies.
    pub fn resolved_config_dependencies(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.config_dependencies.iter().map(|p| self.resolve(p))
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_env_file() -> bool {
    true
}

fn default_client_dir() -> PathBuf {
    PathBuf::from("node_modules/fob/dist/client")
}
