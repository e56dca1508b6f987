//! Source access for hot update hooks.
//!
//! Hooks may want the new contents of the changed file. Reading is deferred
//! until a hook asks for it, and goes through [`SourceReader`] so embedders
//! serving from a virtual filesystem can plug in their own storage.

use std::path::Path;

use async_trait::async_trait;

/// Reads the current contents of a changed file.
#[async_trait]
pub trait SourceReader: Send + Sync + std::fmt::Debug {
    async fn read_source(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads from the real filesystem through `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

#[async_trait]
impl SourceReader for FsReader {
    async fn read_source(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}
