//! Shared test utilities for fob-hmr tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fob_graph::{ModuleGraph, ModuleIdx};
use fob_hmr::{HmrChannel, HmrConfig, HmrPayload, ServerControl, SourceReader};
use parking_lot::Mutex;

pub const ROOT: &str = "/project";

/// Channel that keeps every payload it is given.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<HmrPayload>>,
}

impl RecordingChannel {
    pub fn take(&self) -> Vec<HmrPayload> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl HmrChannel for RecordingChannel {
    fn send(&self, payload: &HmrPayload) {
        self.sent.lock().push(payload.clone());
    }
}

/// Counts restart requests.
#[derive(Debug, Default)]
pub struct CountingServer {
    pub restarts: AtomicUsize,
}

impl CountingServer {
    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServerControl for CountingServer {
    async fn restart(&self) -> fob_hmr::Result<()> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Serves fixed contents for every path.
#[derive(Debug)]
pub struct FixedReader(pub &'static str);

#[async_trait]
impl SourceReader for FixedReader {
    async fn read_source(&self, _path: &Path) -> std::io::Result<String> {
        Ok(self.0.to_string())
    }
}

pub fn project_file(relative: &str) -> PathBuf {
    Path::new(ROOT).join(relative)
}

pub fn test_config() -> HmrConfig {
    HmrConfig {
        config_file: Some(PathBuf::from("fob.config.ts")),
        ..HmrConfig::new(ROOT)
    }
}

/// Add a module for `/<relative>` backed by `<ROOT>/<relative>`.
pub fn add_module(graph: &ModuleGraph, relative: &str) -> ModuleIdx {
    graph
        .write()
        .ensure_entry_from_url(&format!("/{relative}"), Some(project_file(relative).as_path()))
        .unwrap()
}

pub fn recording() -> Arc<RecordingChannel> {
    Arc::new(RecordingChannel::default())
}
