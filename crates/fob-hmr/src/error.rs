//! Error types for the hot update engine.
//!
//! Graph shape never produces an error: every combination of modules and
//! edges resolves to either a partial update or a full reload. Errors here
//! come from the collaborators the engine calls into (plugin hooks, the
//! server restart handler, configuration loading).

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HmrError>;

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum HmrError {
    /// A `handle_hot_update` hook failed; surfaced to the caller unchanged.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// The server restart handler reported a failure.
    #[error("server restart failed: {0}")]
    Restart(String),

    /// Invalid engine configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while running the hot update hook chain.
#[derive(Debug, Error)]
pub enum HookError {
    /// Plugin code reported a failure.
    #[error("hot update hook '{hook}' failed: {message}")]
    Failed { hook: String, message: String },

    /// The changed file could not be read for a hook.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HookError {
    /// Convenience constructor for hook implementations.
    pub fn failed(hook: impl Into<String>, message: impl Into<String>) -> Self {
        HookError::Failed {
            hook: hook.into(),
            message: message.into(),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("failed to extract HMR configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}
