//! Wire messages sent to connected clients.
//!
//! The JSON shape is the contract with the client runtime:
//!
//! ```text
//! { "type": "full-reload", "path"?: string }
//! { "type": "update", "updates": [{ "type": "js-update" | "css-update",
//!                                   "timestamp": number,
//!                                   "path": string,
//!                                   "acceptedPath": string }] }
//! ```

use fob_graph::ModuleKind;
use serde::{Deserialize, Serialize};

/// Path value meaning "reload every page".
pub const RELOAD_ALL: &str = "*";

/// Message broadcast once per processed file-change event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HmrPayload {
    /// Reload the page. `path` scopes the reload to one HTML document;
    /// absent or `"*"` reloads the whole app.
    FullReload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Apply the listed module patches without reloading.
    Update { updates: Vec<Update> },
}

impl HmrPayload {
    /// Unscoped full reload.
    pub fn full_reload() -> Self {
        HmrPayload::FullReload {
            path: Some(RELOAD_ALL.to_string()),
        }
    }

    /// Full reload scoped to one page.
    pub fn page_reload(path: impl Into<String>) -> Self {
        HmrPayload::FullReload {
            path: Some(path.into()),
        }
    }

    pub fn is_full_reload(&self) -> bool {
        matches!(self, HmrPayload::FullReload { .. })
    }

    /// Update records, empty for reloads.
    pub fn updates(&self) -> &[Update] {
        match self {
            HmrPayload::Update { updates } => updates,
            HmrPayload::FullReload { .. } => &[],
        }
    }
}

/// One module patch: `path` receives the new code of `accepted_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub timestamp: u64,
    pub path: String,
    pub accepted_path: String,
}

/// Patch strategy the client applies, derived from the boundary's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateKind {
    #[serde(rename = "js-update")]
    Js,
    #[serde(rename = "css-update")]
    Css,
}

impl From<ModuleKind> for UpdateKind {
    fn from(kind: ModuleKind) -> Self {
        match kind {
            ModuleKind::Js => UpdateKind::Js,
            ModuleKind::Css => UpdateKind::Css,
        }
    }
}
