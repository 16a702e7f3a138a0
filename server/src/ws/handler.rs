use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};

use crate::state::AppState;
use crate::ws::actor;

/// GET /ws
/// WebSocket upgrade endpoint. Connections are anonymous at this layer;
/// feature routers own any in-channel authentication. On success, spawns an
/// actor for the connection.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_upgraded(socket, state))
}

/// Handle an upgraded WebSocket connection by spawning the actor.
async fn handle_upgraded(socket: WebSocket, state: AppState) {
    actor::run_connection(socket, state.hub).await;
}
