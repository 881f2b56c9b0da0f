//! Pairing state machine and relay lookup.
//!
//! [`MatchmakingState`] owns the participant registry, the waiting pool and
//! the active-pair mapping as one value so that every operation can update
//! all three atomically. It performs no I/O and takes no locks; callers
//! serialize access (see [`crate::service::PairingService`]) and deliver the
//! returned [`Outbound`] events afterwards.
//!
//! Every handle is in exactly one of: nowhere (idle or gone), the waiting
//! pool, or the pair mapping.

use serde::Serialize;
use thiserror::Error;

use super::active_pairs::{ActivePairs, Dissolution};
use super::outbound::{Delivery, Outbound};
use super::participant::{Outbox, PairingState, Participant};
use super::participant_registry::ParticipantRegistry;
use super::relay::RelayPayload;
use super::waiting_pool::WaitingPool;
use super::{ParticipantEvent, ParticipantId};

/// Point-in-time counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchmakingStats {
    /// Registered participants.
    pub participants: usize,
    /// Participants in the waiting pool.
    pub waiting: usize,
    /// Active pairs.
    pub pairs: usize,
}

/// A broken structural invariant, reported by
/// [`MatchmakingState::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// `a -> b` exists without `b -> a`.
    #[error("asymmetric pair: {0} -> {1} has no reverse entry")]
    AsymmetricPair(ParticipantId, ParticipantId),
    /// A handle is both waiting and paired.
    #[error("participant {0} is both waiting and paired")]
    WaitingWhilePaired(ParticipantId),
    /// A handle in the pool or the mapping is not registered.
    #[error("participant {0} is referenced but not registered")]
    Unregistered(ParticipantId),
}

/// Registry, waiting pool and pair mapping behind one owner.
#[derive(Debug, Default)]
pub struct MatchmakingState {
    registry: ParticipantRegistry,
    pool: WaitingPool,
    pairs: ActivePairs,
}

impl MatchmakingState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly connected participant in the Idle state.
    ///
    /// Returns `false` if the handle is already registered.
    pub fn register(&mut self, id: ParticipantId, outbox: Outbox) -> bool {
        let inserted = self.registry.insert(Participant::new(id, outbox));
        if inserted {
            tracing::info!(participant = %id, "participant connected");
        }
        inserted
    }

    /// Returns where `id` sits in matchmaking, or `None` if unknown.
    #[must_use]
    pub fn pairing_state(&self, id: ParticipantId) -> Option<PairingState> {
        if !self.registry.contains(id) {
            return None;
        }
        if let Some(partner) = self.pairs.partner_of(id) {
            Some(PairingState::Paired(partner))
        } else if self.pool.contains(id) {
            Some(PairingState::Waiting)
        } else {
            Some(PairingState::Idle)
        }
    }

    /// Returns `id`'s partner, if paired.
    #[must_use]
    pub fn partner_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        self.pairs.partner_of(id)
    }

    /// Pairs `id` with the oldest live waiting participant, or enqueues it.
    ///
    /// An existing pair is dissolved first (the old partner is told), so
    /// this doubles as "find me someone else". Waiting entries whose
    /// connection has already closed are discarded and the next one is
    /// tried. Unknown handles are ignored.
    pub fn request_partner(&mut self, id: ParticipantId) -> Vec<Outbound> {
        if !self.registry.contains(id) {
            tracing::debug!(participant = %id, "partner requested for unknown participant");
            return Vec::new();
        }

        let mut outbound = self.leave_pair(id, true);

        while let Some(candidate) = self.pool.dequeue_oldest() {
            if candidate == id {
                continue;
            }
            if !self.registry.is_live(candidate) {
                tracing::warn!(participant = %id, candidate = %candidate, "skipping stale waiting candidate");
                continue;
            }
            if self.pairs.is_paired(candidate) {
                tracing::error!(candidate = %candidate, "waiting candidate is already paired, dropping it from the pool");
                continue;
            }
            if !self.pairs.link(id, candidate) {
                tracing::error!(participant = %id, candidate = %candidate, "failed to link pair");
                continue;
            }

            for member in [id, candidate] {
                if let Some(participant) = self.registry.get_mut(member) {
                    participant.pairs_formed = participant.pairs_formed.saturating_add(1);
                }
            }
            tracing::info!(participant = %id, partner = %candidate, "pair formed");
            outbound.push(Outbound::new(id, ParticipantEvent::PartnerFound));
            outbound.push(Outbound::new(candidate, ParticipantEvent::PartnerFound));
            return outbound;
        }

        self.pool.enqueue(id);
        tracing::debug!(participant = %id, waiting = self.pool.len(), "waiting for partner");
        outbound.push(Outbound::new(id, ParticipantEvent::WaitingForPartner));
        outbound
    }

    /// Runs [`Self::request_partner`] only if `id` is registered and Idle.
    ///
    /// Used by the deferred rematch after `next-partner`: a participant that
    /// already re-entered matchmaking or disconnected in the meantime is
    /// left alone.
    pub fn request_partner_if_idle(&mut self, id: ParticipantId) -> Vec<Outbound> {
        match self.pairing_state(id) {
            Some(PairingState::Idle) => self.request_partner(id),
            state => {
                tracing::debug!(participant = %id, ?state, "deferred rematch skipped");
                Vec::new()
            }
        }
    }

    /// Dissolves `id`'s pair, if any, and takes it out of the waiting pool.
    ///
    /// With `notify`, the former partner receives `partner-disconnected`.
    /// Calling this without an active pair is a no-op apart from the pool
    /// removal.
    pub fn leave_pair(&mut self, id: ParticipantId, notify: bool) -> Vec<Outbound> {
        let mut outbound = Vec::new();
        self.pool.remove(id);

        match self.pairs.dissolve(id) {
            Dissolution::NotPaired => {}
            Dissolution::Dissolved(partner) => {
                tracing::info!(participant = %id, partner = %partner, "pair dissolved");
                if notify {
                    outbound.push(Outbound::new(partner, ParticipantEvent::PartnerDisconnected));
                }
            }
            Dissolution::Asymmetric(partner) => {
                tracing::error!(
                    participant = %id,
                    partner = %partner,
                    "asymmetric pair entry, participant reset to idle"
                );
            }
        }
        outbound
    }

    /// Forgets a disconnected participant.
    ///
    /// Dissolves its pair (notifying the partner) and removes it from the
    /// pool and the registry. A second call for the same handle does
    /// nothing.
    pub fn disconnect(&mut self, id: ParticipantId) -> Vec<Outbound> {
        if !self.registry.contains(id) {
            tracing::debug!(participant = %id, "duplicate disconnect ignored");
            return Vec::new();
        }
        let outbound = self.leave_pair(id, true);
        if let Some(participant) = self.registry.remove(id) {
            tracing::info!(
                participant = %id,
                pairs_formed = participant.pairs_formed,
                connected_secs = participant.connected_for().num_seconds(),
                "participant disconnected"
            );
        }
        outbound
    }

    /// Addresses `payload` to `sender`'s partner.
    ///
    /// Returns `None` (the payload is dropped) when the sender has no
    /// partner. A one-sided pair entry is treated as corruption: it is
    /// logged, the sender is reset to Idle and nothing is forwarded.
    pub fn relay(&mut self, sender: ParticipantId, payload: RelayPayload) -> Option<Outbound> {
        let kind = payload.kind();
        let Some(partner) = self.pairs.partner_of(sender) else {
            tracing::debug!(participant = %sender, %kind, "no partner, relay dropped");
            return None;
        };
        if self.pairs.partner_of(partner) != Some(sender) {
            tracing::error!(participant = %sender, partner = %partner, "asymmetric pair entry on relay");
            let _ = self.leave_pair(sender, false);
            return None;
        }
        tracing::debug!(participant = %sender, partner = %partner, %kind, "relaying");
        Some(Outbound::new(partner, payload.into_event()))
    }

    /// Resolves recipients to their outboxes. Events for handles that are
    /// no longer registered are dropped.
    #[must_use]
    pub fn resolve(&self, outbound: Vec<Outbound>) -> Vec<Delivery> {
        outbound
            .into_iter()
            .filter_map(|Outbound { recipient, event }| {
                let Some(participant) = self.registry.get(recipient) else {
                    tracing::debug!(participant = %recipient, event = event.event_name(), "recipient not registered, event dropped");
                    return None;
                };
                Some(Delivery {
                    recipient,
                    outbox: participant.outbox.clone(),
                    event,
                })
            })
            .collect()
    }

    /// Returns current counters.
    #[must_use]
    pub fn stats(&self) -> MatchmakingStats {
        MatchmakingStats {
            participants: self.registry.len(),
            waiting: self.pool.len(),
            pairs: self.pairs.pair_count(),
        }
    }

    /// Returns waiting handles from oldest to newest.
    #[must_use]
    pub fn waiting(&self) -> Vec<ParticipantId> {
        self.pool.iter().collect()
    }

    /// Checks symmetry, exclusivity, and that every referenced handle is
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (a, b) in self.pairs.iter() {
            if self.pairs.partner_of(b) != Some(a) {
                return Err(InvariantViolation::AsymmetricPair(a, b));
            }
            if !self.registry.contains(a) {
                return Err(InvariantViolation::Unregistered(a));
            }
        }
        for id in self.pool.iter() {
            if self.pairs.is_paired(id) {
                return Err(InvariantViolation::WaitingWhilePaired(id));
            }
            if !self.registry.contains(id) {
                return Err(InvariantViolation::Unregistered(id));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pairs_mut(&mut self) -> &mut ActivePairs {
        &mut self.pairs
    }

    #[cfg(test)]
    pub(crate) fn pool_mut(&mut self) -> &mut WaitingPool {
        &mut self.pool
    }
}
