//! Outbound channel to connected clients.
//!
//! The engine hands every decided payload to an [`HmrChannel`]. The transport
//! that carries it to browsers (SSE, WebSocket, BroadcastChannel) lives
//! outside this crate; [`ClientRegistry`] is the in-process fan-out those
//! transports subscribe to.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::payload::HmrPayload;

/// Per-client buffer size. A client this far behind starts losing messages.
const CLIENT_BUFFER: usize = 100;

/// Sink for hot update payloads.
pub trait HmrChannel: Send + Sync {
    fn send(&self, payload: &HmrPayload);
}

/// Tracks connected clients and broadcasts serialized payloads to them.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<usize, mpsc::Sender<String>>>,
    next_client_id: AtomicUsize,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client.
    ///
    /// # Returns
    ///
    /// Client ID and a receiver yielding JSON-encoded payloads
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);
        (id, rx)
    }

    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

impl HmrChannel for ClientRegistry {
    fn send(&self, payload: &HmrPayload) {
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize hmr payload");
                return;
            }
        };

        let mut closed = Vec::new();
        for (id, tx) in self.clients.read().iter() {
            match tx.try_send(json.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(client = id, "client is not keeping up, dropping hmr message");
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }

        // Remove disconnected clients after iteration
        if !closed.is_empty() {
            let mut clients = self.clients.write();
            for id in closed {
                clients.remove(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_to_all_clients() {
        let registry = ClientRegistry::new();
        let (id1, mut rx1) = registry.register_client();
        let (id2, mut rx2) = registry.register_client();
        assert_ne!(id1, id2);
        assert_eq!(registry.client_count(), 2);

        registry.send(&HmrPayload::full_reload());

        let expected = r#"{"type":"full-reload","path":"*"}"#;
        assert_eq!(rx1.recv().await.as_deref(), Some(expected));
        assert_eq!(rx2.recv().await.as_deref(), Some(expected));
    }

    #[tokio::test]
    async fn test_closed_clients_are_pruned() {
        let registry = ClientRegistry::new();
        let (_, rx1) = registry.register_client();
        let (_, mut rx2) = registry.register_client();
        drop(rx1);

        registry.send(&HmrPayload::full_reload());

        assert_eq!(registry.client_count(), 1);
        assert!(rx2.recv().await.is_some());
    }

    #[test]
    fn test_unregister_client() {
        let registry = ClientRegistry::new();
        let (id, _rx) = registry.register_client();
        registry.unregister_client(id);
        assert_eq!(registry.client_count(), 0);
    }
}
