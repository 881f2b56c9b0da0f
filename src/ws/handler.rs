//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::error::GatewayError;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// # Errors
///
/// Returns [`GatewayError::CapacityReached`] when `MAX_PARTICIPANTS` is set
/// and that many participants are already connected. The check is not
/// atomic with registration, so the cap can be overshot by concurrent
/// upgrades.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let limit = state.config.max_participants;
    if limit > 0 && state.pairing.stats().await.participants >= limit {
        tracing::warn!(limit, "rejecting connection, participant capacity reached");
        return Err(GatewayError::CapacityReached { limit });
    }

    let service = state.pairing.clone();
    let max_chat_chars = state.config.max_chat_chars;

    Ok(ws
        .max_message_size(state.config.max_message_bytes)
        .on_upgrade(move |socket| run_connection(socket, service, max_chat_chars)))
}
