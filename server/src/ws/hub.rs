use std::sync::Arc;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use super::ConnectionSender;

/// Opaque identity assigned to a connection once its upgrade completes.
pub type ConnectionId = String;

/// Registry entry for one open connection.
#[derive(Debug)]
pub struct ConnectionEntry {
    pub sender: ConnectionSender,
    pub established_at: DateTime<Utc>,
}

/// Process-wide realtime hub owning the connection registry.
///
/// A connection moves through Connecting -> Open -> Closed: the upgrade
/// handshake (Connecting) is owned by the transport, `register` marks it
/// Open, and `unregister` removes it (Closed). Emitting to a closed id is a
/// silent no-op — disconnect races are part of normal operation, not errors.
///
/// Cloning the hub clones a handle to the same registry; handlers receive a
/// handle through request extensions and push events without owning the
/// registry.
#[derive(Clone, Default)]
pub struct ChannelHub {
    connections: Arc<DashMap<ConnectionId, ConnectionEntry>>,
}

/// Wire shape of one outbound event frame. The in-channel protocol beyond
/// this framing is owned by the feature routers.
#[derive(Debug, Serialize)]
struct EventFrame<'a, T: Serialize> {
    event: &'a str,
    payload: &'a T,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection that completed its upgrade handshake and return
    /// its assigned id.
    pub fn register(&self, sender: ConnectionSender) -> ConnectionId {
        let id = uuid::Uuid::new_v4().to_string();
        self.connections.insert(
            id.clone(),
            ConnectionEntry {
                sender,
                established_at: Utc::now(),
            },
        );

        tracing::info!(
            connection_id = %id,
            connections = self.connections.len(),
            "client connected"
        );
        id
    }

    /// Drop a connection from the registry. Safe to call for an id that was
    /// already removed.
    pub fn unregister(&self, id: &str) {
        if self.connections.remove(id).is_some() {
            tracing::info!(
                connection_id = %id,
                connections = self.connections.len(),
                "client disconnected"
            );
        }
    }

    /// Deliver an event to every open connection. Best effort: no delivery
    /// acknowledgment, no ordering guarantee across connections.
    pub fn broadcast<T: Serialize>(&self, event: &str, payload: &T) {
        let Some(msg) = encode_frame(event, payload) else {
            return;
        };

        for entry in self.connections.iter() {
            let _ = entry.value().sender.send(msg.clone());
        }
    }

    /// Deliver an event to one connection if it is still open; silent no-op
    /// otherwise.
    pub fn emit_to<T: Serialize>(&self, id: &str, event: &str, payload: &T) {
        let Some(msg) = encode_frame(event, payload) else {
            return;
        };

        if let Some(entry) = self.connections.get(id) {
            let _ = entry.value().sender.send(msg);
        }
    }

    /// Number of connections currently open.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

/// Encode `{"event": ..., "payload": ...}` as one text frame.
fn encode_frame<T: Serialize>(event: &str, payload: &T) -> Option<Message> {
    match serde_json::to_string(&EventFrame { event, payload }) {
        Ok(text) => Some(Message::Text(text.into())),
        Err(e) => {
            tracing::warn!(event = %event, error = %e, "failed to encode event frame");
            None
        }
    }
}
