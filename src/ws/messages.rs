//! WebSocket wire types: inbound client events and outbound frames.
//!
//! Both directions use the same shape, `{"event": "<name>", "data": ...}`.
//! Outbound frames additionally carry a server timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ParticipantEvent, RelayPayload};
use crate::error::FrameError;

/// Event names a client may send.
pub const CLIENT_EVENTS: [&str; 6] = [
    "find-partner",
    "send-message",
    "webrtc-offer",
    "webrtc-answer",
    "webrtc-ice-candidate",
    "next-partner",
];

/// Events sent by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Enter matchmaking.
    FindPartner,
    /// Chat text for the partner.
    SendMessage {
        /// Chat text.
        message: String,
    },
    /// Session offer for the partner.
    WebrtcOffer {
        /// Opaque offer.
        offer: Value,
    },
    /// Session answer for the partner.
    WebrtcAnswer {
        /// Opaque answer.
        answer: Value,
    },
    /// Connectivity candidate for the partner.
    WebrtcIceCandidate {
        /// Opaque candidate.
        candidate: Value,
    },
    /// Drop the current partner and look for another one.
    NextPartner,
}

impl ClientEvent {
    /// Parses and validates one text frame.
    ///
    /// # Errors
    ///
    /// - [`FrameError::Malformed`] for invalid JSON, a missing `event`,
    ///   or a missing/null/ill-typed payload field.
    /// - [`FrameError::UnknownEvent`] for an event outside
    ///   [`CLIENT_EVENTS`].
    /// - [`FrameError::MessageTooLong`] for chat text over `max_chat_chars`.
    pub fn parse(text: &str, max_chat_chars: usize) -> Result<Self, FrameError> {
        let raw: Value =
            serde_json::from_str(text).map_err(|e| FrameError::Malformed(e.to_string()))?;
        let Some(name) = raw.get("event").and_then(Value::as_str) else {
            return Err(FrameError::Malformed("missing event name".to_string()));
        };
        if !CLIENT_EVENTS.contains(&name) {
            return Err(FrameError::UnknownEvent(name.to_string()));
        }

        let event: Self =
            serde_json::from_value(raw).map_err(|e| FrameError::Malformed(e.to_string()))?;

        match &event {
            Self::SendMessage { message } if message.chars().count() > max_chat_chars => {
                Err(FrameError::MessageTooLong {
                    limit: max_chat_chars,
                })
            }
            Self::WebrtcOffer { offer: Value::Null } => {
                Err(FrameError::Malformed("offer must not be null".to_string()))
            }
            Self::WebrtcAnswer { answer: Value::Null } => {
                Err(FrameError::Malformed("answer must not be null".to_string()))
            }
            Self::WebrtcIceCandidate {
                candidate: Value::Null,
            } => Err(FrameError::Malformed("candidate must not be null".to_string())),
            _ => Ok(event),
        }
    }

    /// Returns the payload to relay, or `None` for matchmaking events.
    #[must_use]
    pub fn into_relay(self) -> Option<RelayPayload> {
        match self {
            Self::SendMessage { message } => Some(RelayPayload::Chat(message)),
            Self::WebrtcOffer { offer } => Some(RelayPayload::Offer(offer)),
            Self::WebrtcAnswer { answer } => Some(RelayPayload::Answer(answer)),
            Self::WebrtcIceCandidate { candidate } => Some(RelayPayload::Candidate(candidate)),
            Self::FindPartner | Self::NextPartner => None,
        }
    }
}

/// Outbound frame: a [`ParticipantEvent`] plus a server timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct ServerFrame {
    /// The event, flattened into `event`/`data`.
    #[serde(flatten)]
    pub event: ParticipantEvent,
    /// ISO-8601 send time.
    pub timestamp: DateTime<Utc>,
}

impl ServerFrame {
    /// Stamps `event` with the current time.
    #[must_use]
    pub fn now(event: ParticipantEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }

    /// Serializes the frame to JSON text.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; with the types involved this only
    /// happens for non-string map keys inside an opaque payload.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
