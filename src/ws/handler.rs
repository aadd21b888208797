//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::api::extract::CallerId;
use crate::app_state::AppState;

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
///
/// The caller must be identified; the upgrade is refused with `401`
/// otherwise. The connection subscribes to the event bus before the upgrade
/// completes, so no event recorded after this point is missed.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    let reader = state.reader;
    tracing::debug!(%user_id, "ws upgrade");
    ws.on_upgrade(move |socket| run_connection(socket, event_rx, reader, user_id))
}
