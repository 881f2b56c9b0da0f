//! FIFO queue of participants looking for a partner.

use std::collections::VecDeque;

use super::ParticipantId;

/// Ordered set of waiting participants, oldest first.
///
/// A handle appears at most once: [`WaitingPool::enqueue`] refuses
/// duplicates rather than moving the existing entry.
#[derive(Debug, Default)]
pub struct WaitingPool {
    queue: VecDeque<ParticipantId>,
}

impl WaitingPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` at the tail. Returns `false` if it was already waiting.
    pub fn enqueue(&mut self, id: ParticipantId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.queue.push_back(id);
        true
    }

    /// Removes and returns the oldest waiting participant.
    pub fn dequeue_oldest(&mut self) -> Option<ParticipantId> {
        self.queue.pop_front()
    }

    /// Removes `id` wherever it sits. Returns `true` if it was present.
    pub fn remove(&mut self, id: ParticipantId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|waiting| *waiting != id);
        self.queue.len() != before
    }

    /// Returns `true` if `id` is waiting.
    #[must_use]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.queue.contains(&id)
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.queue.iter().copied()
    }

    /// Returns the number of waiting participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeues_in_arrival_order() {
        let mut pool = WaitingPool::new();
        let ids: Vec<_> = (0..3).map(|_| ParticipantId::new()).collect();
        for id in &ids {
            pool.enqueue(*id);
        }

        let drained: Vec<_> = std::iter::from_fn(|| pool.dequeue_oldest()).collect();
        assert_eq!(drained, ids);
        assert!(pool.is_empty());
    }

    #[test]
    fn enqueue_rejects_duplicates() {
        let mut pool = WaitingPool::new();
        let id = ParticipantId::new();
        assert!(pool.enqueue(id));
        assert!(!pool.enqueue(id));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn remove_from_the_middle_keeps_order() {
        let mut pool = WaitingPool::new();
        let (a, b, c) = (ParticipantId::new(), ParticipantId::new(), ParticipantId::new());
        pool.enqueue(a);
        pool.enqueue(b);
        pool.enqueue(c);

        assert!(pool.remove(b));
        assert!(!pool.remove(b));
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn dequeue_on_empty_is_none() {
        let mut pool = WaitingPool::new();
        assert_eq!(pool.dequeue_oldest(), None);
    }
}
