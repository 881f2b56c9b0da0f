//! Opaque participant handle.
//!
//! [`ParticipantId`] is a newtype wrapper around [`uuid::Uuid`] (v4). One is
//! minted per WebSocket connection and never reused: a client that reconnects
//! gets a brand-new handle and a brand-new registry entry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one live signaling connection.
///
/// Used as the key of the participant registry, the element type of the
/// waiting pool, and both sides of an active-pair entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(uuid::Uuid);

impl ParticipantId {
    /// Mints a fresh random `ParticipantId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wraps an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ParticipantId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
