pub mod actor;
pub mod handler;
pub mod hub;

use tokio::sync::mpsc;

/// Type alias for the sender half of a WebSocket connection's channel.
/// Other parts of the system can clone this to push frames to a specific client.
pub type ConnectionSender = mpsc::UnboundedSender<axum::extract::ws::Message>;

pub use hub::{ChannelHub, ConnectionId};
