//! Addressed outbound messages.
//!
//! Matchmaking operations never write to a connection directly. They return
//! [`Outbound`] values; the service resolves each recipient to a
//! [`Delivery`] and pushes it onto the recipient's unbounded outbox before
//! releasing the lock. The socket write happens later, in the recipient's
//! connection task.

use super::participant::Outbox;
use super::{ParticipantEvent, ParticipantId};

/// An event addressed to one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    /// Who receives the event.
    pub recipient: ParticipantId,
    /// What they receive.
    pub event: ParticipantEvent,
}

impl Outbound {
    /// Addresses `event` to `recipient`.
    #[must_use]
    pub const fn new(recipient: ParticipantId, event: ParticipantEvent) -> Self {
        Self { recipient, event }
    }
}

/// An [`Outbound`] with its recipient's outbox already resolved.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Recipient handle, for logging.
    pub recipient: ParticipantId,
    /// Recipient's outbox.
    pub outbox: Outbox,
    /// Event to push.
    pub event: ParticipantEvent,
}

impl Delivery {
    /// Pushes the event. Returns `false` if the recipient's connection has
    /// already gone away; that is not an error.
    pub fn deliver(self) -> bool {
        let name = self.event.event_name();
        match self.outbox.send(self.event) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!(participant = %self.recipient, event = name, "recipient gone, event dropped");
                false
            }
        }
    }
}
