//! Registry entry for one connected participant.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use super::{ParticipantEvent, ParticipantId};

/// Sending half of a participant's outbound queue.
///
/// The receiving half is drained by the connection's writer. Once the
/// connection goes away the receiver is dropped and the outbox reports
/// itself closed, which is how matchmaking detects a dead candidate.
pub type Outbox = mpsc::UnboundedSender<ParticipantEvent>;

/// Where a participant currently sits in matchmaking.
///
/// Derived from the waiting pool and the active-pair mapping; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "partner", rename_all = "snake_case")]
pub enum PairingState {
    /// Connected but neither waiting nor paired.
    Idle,
    /// Queued in the waiting pool.
    Waiting,
    /// Matched with the given partner.
    Paired(ParticipantId),
}

/// A connected participant as tracked by the registry.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Connection handle (immutable).
    pub id: ParticipantId,

    /// Outbound queue towards this participant's connection.
    pub outbox: Outbox,

    /// When the connection was registered.
    pub connected_at: DateTime<Utc>,

    /// Number of pairs this participant has been part of.
    pub pairs_formed: u64,
}

impl Participant {
    /// Creates a participant entry around an outbox.
    #[must_use]
    pub fn new(id: ParticipantId, outbox: Outbox) -> Self {
        Self {
            id,
            outbox,
            connected_at: Utc::now(),
            pairs_formed: 0,
        }
    }

    /// Returns how long this participant has been connected.
    #[must_use]
    pub fn connected_for(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.connected_at)
    }

    /// Returns `true` while the connection is still draining its outbox.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.outbox.is_closed()
    }
}
