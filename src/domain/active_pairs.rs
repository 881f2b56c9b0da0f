//! Symmetric partner mapping.
//!
//! A pair `{a, b}` is stored as the two directed entries `a -> b` and
//! `b -> a` so either side can find its partner in O(1). Both entries are
//! always inserted and removed together.

use std::collections::HashMap;

use super::ParticipantId;

/// Outcome of [`ActivePairs::dissolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dissolution {
    /// The participant had no partner.
    NotPaired,
    /// Both directions were removed.
    Dissolved(ParticipantId),
    /// `id -> partner` existed but `partner -> id` did not. Only the
    /// `id -> partner` entry was removed; the partner's own entry (if any)
    /// is left as found.
    Asymmetric(ParticipantId),
}

/// Active-pair mapping.
#[derive(Debug, Default)]
pub struct ActivePairs {
    links: HashMap<ParticipantId, ParticipantId>,
}

impl ActivePairs {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts both directions of `{a, b}`.
    ///
    /// Returns `false` without changing anything if `a == b` or either
    /// side is already paired.
    pub fn link(&mut self, a: ParticipantId, b: ParticipantId) -> bool {
        if a == b || self.links.contains_key(&a) || self.links.contains_key(&b) {
            return false;
        }
        self.links.insert(a, b);
        self.links.insert(b, a);
        true
    }

    /// Removes the pair `id` belongs to.
    pub fn dissolve(&mut self, id: ParticipantId) -> Dissolution {
        let Some(partner) = self.links.remove(&id) else {
            return Dissolution::NotPaired;
        };
        if self.links.get(&partner) == Some(&id) {
            self.links.remove(&partner);
            Dissolution::Dissolved(partner)
        } else {
            Dissolution::Asymmetric(partner)
        }
    }

    /// Returns `id`'s partner, if any.
    #[must_use]
    pub fn partner_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        self.links.get(&id).copied()
    }

    /// Returns `true` if `id` has a partner.
    #[must_use]
    pub fn is_paired(&self, id: ParticipantId) -> bool {
        self.links.contains_key(&id)
    }

    /// Iterates over every directed entry.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, ParticipantId)> + '_ {
        self.links.iter().map(|(a, b)| (*a, *b))
    }

    /// Returns the number of pairs (half the number of directed entries).
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.links.len() / 2
    }

    #[cfg(test)]
    pub(crate) fn insert_directed(&mut self, from: ParticipantId, to: ParticipantId) {
        self.links.insert(from, to);
    }
}
