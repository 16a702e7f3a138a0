use std::sync::Arc;

use crate::admission::OriginPolicy;
use crate::ws::ChannelHub;

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Origin allow-list, built at startup and immutable afterwards
    pub policy: Arc<OriginPolicy>,
    /// Realtime connection hub; outlives every individual request
    pub hub: ChannelHub,
}
