//! WebSocket connection loop.
//!
//! One task per connection: registers the participant, reads client frames
//! and dispatches them to the [`PairingService`], and writes everything that
//! lands in the participant's inbox back to the socket.

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};

use super::messages::{ClientEvent, ServerFrame};
use crate::domain::{ParticipantEvent, ParticipantId};
use crate::error::FrameError;
use crate::service::PairingService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// The participant is registered Idle on entry and forgotten on exit,
/// whichever side closed the connection.
pub async fn run_connection(socket: WebSocket, service: PairingService, max_chat_chars: usize) {
    let (id, mut inbox) = service.connect().await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match ClientEvent::parse(text.as_str(), max_chat_chars) {
                            Ok(event) => dispatch(&service, id, event).await,
                            Err(err) => {
                                if reject(&mut ws_tx, id, err).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        if reject(&mut ws_tx, id, FrameError::Binary).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!(participant = %id, error = %err, "ws read failed");
                        break;
                    }
                }
            }
            event = inbox.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut ws_tx, event).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    // Close the inbox first so concurrent matchmaking sees this participant
    // as dead even before the disconnect below takes the lock.
    drop(inbox);
    service.disconnect(id).await;
    tracing::debug!(participant = %id, "ws connection closed");
}

/// Maps one client event to exactly one core operation.
async fn dispatch(service: &PairingService, id: ParticipantId, event: ClientEvent) {
    match event {
        ClientEvent::FindPartner => service.request_partner(id).await,
        ClientEvent::NextPartner => service.request_next_partner(id).await,
        relayed => {
            if let Some(payload) = relayed.into_relay() {
                service.relay(id, payload).await;
            }
        }
    }
}

/// Tells the sender its frame was rejected.
async fn reject(
    ws_tx: &mut SplitSink<WebSocket, Message>,
    id: ParticipantId,
    err: FrameError,
) -> Result<(), axum::Error> {
    tracing::warn!(participant = %id, error = %err, "frame rejected");
    send_event(ws_tx, err.into_event()).await
}

/// Writes one event as a timestamped JSON text frame.
async fn send_event(
    ws_tx: &mut SplitSink<WebSocket, Message>,
    event: ParticipantEvent,
) -> Result<(), axum::Error> {
    match ServerFrame::now(event).to_json() {
        Ok(json) => ws_tx.send(Message::text(json)).await,
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize outbound frame");
            Ok(())
        }
    }
}
