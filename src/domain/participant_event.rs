//! Events addressed to a single participant.
//!
//! Every matchmaking transition and every relayed payload ends up as a
//! [`ParticipantEvent`] pushed into exactly one participant's outbox. The
//! WebSocket layer wraps it in a timestamped frame before writing it out.

use serde::Serialize;
use serde_json::Value;

use super::ParticipantId;

/// Outbound event delivered to one participant.
///
/// Serialized adjacently tagged, e.g. `{"event":"partner-found"}` or
/// `{"event":"webrtc-offer","data":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ParticipantEvent {
    /// First frame on every connection; carries the participant's handle.
    Connected {
        /// Handle assigned to this connection.
        id: ParticipantId,
    },

    /// The participant was enqueued because no live partner was available.
    WaitingForPartner,

    /// A pair was formed. Sent to both members.
    PartnerFound,

    /// The participant's partner left, disconnected, or asked for someone new.
    PartnerDisconnected,

    /// Chat text relayed from the partner.
    ReceiveMessage {
        /// Chat text, forwarded unmodified.
        message: String,
        /// Always `false` on relayed messages: the text is from the partner.
        #[serde(rename = "isOwn")]
        is_own: bool,
    },

    /// Opaque session offer relayed from the partner.
    WebrtcOffer(Value),

    /// Opaque session answer relayed from the partner.
    WebrtcAnswer(Value),

    /// Opaque connectivity candidate relayed from the partner.
    WebrtcIceCandidate(Value),

    /// A frame sent by this participant was rejected at the boundary.
    Error {
        /// Numeric rejection code.
        code: u16,
        /// Human-readable reason.
        message: String,
    },
}

impl ParticipantEvent {
    /// Returns the wire name of the event.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::WaitingForPartner => "waiting-for-partner",
            Self::PartnerFound => "partner-found",
            Self::PartnerDisconnected => "partner-disconnected",
            Self::ReceiveMessage { .. } => "receive-message",
            Self::WebrtcOffer(_) => "webrtc-offer",
            Self::WebrtcAnswer(_) => "webrtc-answer",
            Self::WebrtcIceCandidate(_) => "webrtc-ice-candidate",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn to_json(event: &ParticipantEvent) -> Value {
        let Ok(value) = serde_json::to_value(event) else {
            panic!("serialization failed");
        };
        value
    }

    #[test]
    fn unit_events_carry_only_the_tag() {
        let json = to_json(&ParticipantEvent::PartnerFound);
        assert_eq!(json, serde_json::json!({ "event": "partner-found" }));
    }

    #[test]
    fn chat_is_tagged_as_not_own() {
        let json = to_json(&ParticipantEvent::ReceiveMessage {
            message: "hi".to_string(),
            is_own: false,
        });
        assert_eq!(json["event"], "receive-message");
        assert_eq!(json["data"]["message"], "hi");
        assert_eq!(json["data"]["isOwn"], false);
    }

    #[test]
    fn negotiation_payload_is_forwarded_verbatim() {
        let offer = serde_json::json!({ "type": "offer", "sdp": "v=0\r\n", "extra": [1, 2] });
        let json = to_json(&ParticipantEvent::WebrtcOffer(offer.clone()));
        assert_eq!(json["event"], "webrtc-offer");
        assert_eq!(json["data"], offer);
    }

    #[test]
    fn event_name_matches_serialized_tag() {
        let events = [
            ParticipantEvent::Connected {
                id: ParticipantId::new(),
            },
            ParticipantEvent::WaitingForPartner,
            ParticipantEvent::PartnerDisconnected,
            ParticipantEvent::WebrtcAnswer(Value::Null),
            ParticipantEvent::WebrtcIceCandidate(Value::Null),
            ParticipantEvent::Error {
                code: 400,
                message: "bad".to_string(),
            },
        ];
        for event in &events {
            assert_eq!(to_json(event)["event"], event.event_name());
        }
    }
}
