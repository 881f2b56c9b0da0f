//! Registry of connected participants.
//!
//! [`ParticipantRegistry`] is a plain map keyed by [`ParticipantId`]. It
//! carries no lock of its own: it lives inside
//! [`super::MatchmakingState`] and is only touched under the single
//! matchmaking mutex.

use std::collections::HashMap;

use super::ParticipantId;
use super::participant::Participant;

/// Every participant whose connection is currently open.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: HashMap<ParticipantId, Participant>,
}

impl ParticipantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a participant. Returns `false` (and leaves the existing
    /// entry untouched) if the handle is already registered.
    pub fn insert(&mut self, participant: Participant) -> bool {
        if self.participants.contains_key(&participant.id) {
            return false;
        }
        self.participants.insert(participant.id, participant);
        true
    }

    /// Returns the entry for `id`, if registered.
    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Returns a mutable entry for `id`, if registered.
    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(&id)
    }

    /// Removes and returns the entry for `id`.
    pub fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        self.participants.remove(&id)
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants.contains_key(&id)
    }

    /// Returns `true` if `id` is registered and its connection is still open.
    #[must_use]
    pub fn is_live(&self, id: ParticipantId) -> bool {
        self.participants.get(&id).is_some_and(Participant::is_live)
    }

    /// Returns the number of registered participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if nobody is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
