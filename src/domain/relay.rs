//! Payloads forwarded between the two members of a pair.

use std::fmt;

use serde_json::Value;

use super::ParticipantEvent;

/// What a relayed payload is, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayKind {
    /// Session description offer.
    NegotiationOffer,
    /// Session description answer.
    NegotiationAnswer,
    /// Connectivity candidate.
    NegotiationCandidate,
    /// Chat text.
    ChatMessage,
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NegotiationOffer => "negotiation-offer",
            Self::NegotiationAnswer => "negotiation-answer",
            Self::NegotiationCandidate => "negotiation-candidate",
            Self::ChatMessage => "chat-message",
        })
    }
}

/// A payload to forward to the sender's partner.
///
/// Negotiation payloads are opaque JSON and are never inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayPayload {
    /// Forwarded as `webrtc-offer`.
    Offer(Value),
    /// Forwarded as `webrtc-answer`.
    Answer(Value),
    /// Forwarded as `webrtc-ice-candidate`.
    Candidate(Value),
    /// Forwarded as `receive-message`, tagged as coming from the partner.
    Chat(String),
}

impl RelayPayload {
    /// Returns the payload kind.
    #[must_use]
    pub const fn kind(&self) -> RelayKind {
        match self {
            Self::Offer(_) => RelayKind::NegotiationOffer,
            Self::Answer(_) => RelayKind::NegotiationAnswer,
            Self::Candidate(_) => RelayKind::NegotiationCandidate,
            Self::Chat(_) => RelayKind::ChatMessage,
        }
    }

    /// Converts the payload into the event the partner receives.
    #[must_use]
    pub fn into_event(self) -> ParticipantEvent {
        match self {
            Self::Offer(offer) => ParticipantEvent::WebrtcOffer(offer),
            Self::Answer(answer) => ParticipantEvent::WebrtcAnswer(answer),
            Self::Candidate(candidate) => ParticipantEvent::WebrtcIceCandidate(candidate),
            Self::Chat(message) => ParticipantEvent::ReceiveMessage {
                message,
                is_own: false,
            },
        }
    }
}
