use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

use crate::ws::ChannelHub;

/// Ping interval: server sends WebSocket ping every 30 seconds.
/// Prevents registry leaks from abrupt disconnects.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Pong timeout: if pong not received within 10 seconds after ping, close.
const PONG_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the actor-per-connection pattern for an upgraded socket.
///
/// Splits the WebSocket into reader and writer halves:
/// - Writer task: owns the sink, forwards frames from an mpsc channel
/// - Reader loop: keepalive bookkeeping and close detection
///
/// The mpsc channel allows any part of the system holding the hub to push
/// frames to this client until the connection is unregistered.
pub async fn run_connection(socket: WebSocket, hub: ChannelHub) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    // Register this connection in the hub; it is now Open.
    let connection_id = hub.register(tx.clone());

    // Tell the client which identity it was assigned.
    hub.emit_to(
        &connection_id,
        "connected",
        &json!({ "connection_id": connection_id }),
    );

    // Spawn writer task: forwards mpsc messages to WebSocket sink
    let writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    // Track pong reception
    let (pong_tx, mut pong_rx) = mpsc::unbounded_channel::<()>();

    // Spawn ping task: sends periodic pings and monitors pong responses
    let ping_tx = tx.clone();
    let ping_handle = tokio::spawn(async move {
        let mut ping_timer = interval(PING_INTERVAL);
        // Skip the first immediate tick
        ping_timer.tick().await;

        loop {
            ping_timer.tick().await;

            if ping_tx.send(Message::Ping(vec![1, 2, 3, 4].into())).is_err() {
                // Writer task has died — connection is gone
                break;
            }

            match timeout(PONG_TIMEOUT, pong_rx.recv()).await {
                Ok(Some(())) => {
                    // Pong received, continue
                }
                _ => {
                    // Pong timeout or channel closed — close connection
                    tracing::warn!("pong timeout, closing connection");
                    let _ = ping_tx.send(Message::Close(Some(CloseFrame {
                        code: 1001,
                        reason: "Pong timeout".into(),
                    })));
                    break;
                }
            }
        }
    });

    // Reader loop: process incoming WebSocket messages
    loop {
        match ws_receiver.next().await {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    // The in-channel protocol is owned by the feature
                    // routers; the gateway only logs what it sees.
                    tracing::debug!(
                        connection_id = %connection_id,
                        "inbound text frame: {}",
                        text.chars().take(100).collect::<String>()
                    );
                }
                Message::Binary(data) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        bytes = data.len(),
                        "inbound binary frame"
                    );
                }
                Message::Pong(_) => {
                    // Pong received — notify the ping task
                    let _ = pong_tx.send(());
                }
                Message::Ping(data) => {
                    // Respond to client pings with pong
                    let _ = tx.send(Message::Pong(data));
                }
                Message::Close(frame) => {
                    tracing::info!(
                        connection_id = %connection_id,
                        reason = ?frame,
                        "client initiated close"
                    );
                    break;
                }
            },
            Some(Err(e)) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "websocket receive error"
                );
                break;
            }
            None => {
                // Stream ended — client disconnected
                tracing::info!(connection_id = %connection_id, "websocket stream ended");
                break;
            }
        }
    }

    // Cleanup: abort writer and ping tasks, then the connection is Closed.
    writer_handle.abort();
    ping_handle.abort();

    hub.unregister(&connection_id);
}

/// Writer task: receives messages from mpsc channel and forwards them to the WebSocket sink.
async fn writer_task(
    mut ws_sender: futures_util::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if ws_sender.send(msg).await.is_err() {
            // WebSocket send failed — connection is broken
            break;
        }
    }
}
