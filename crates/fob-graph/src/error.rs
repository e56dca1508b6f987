//! Error types for graph mutations.

use thiserror::Error;

use crate::ModuleIdx;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by the resolver-facing mutation API.
///
/// Read-only walks over the graph never fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("module URL must not be empty")]
    EmptyUrl,

    #[error("module graph is full ({0} modules)")]
    TooManyModules(usize),

    #[error("unknown module {0}")]
    UnknownModule(ModuleIdx),

    #[error("module {importer} cannot accept {dep}: it does not import it")]
    NotImported { importer: ModuleIdx, dep: ModuleIdx },
}
