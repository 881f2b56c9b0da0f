//! Pairing service: serializes matchmaking and delivers its events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use crate::domain::{
    MatchmakingState, MatchmakingStats, Outbound, PairingState, ParticipantEvent, ParticipantId,
    RelayPayload,
};

/// Receiving half of a participant's outbox, drained by its connection.
pub type Inbox = mpsc::UnboundedReceiver<ParticipantEvent>;

/// Async front of the matchmaking state machine.
///
/// Every mutation follows the same pattern: lock → mutate
/// [`MatchmakingState`] → resolve recipients → enqueue → unlock. Enqueueing
/// onto an unbounded outbox never waits; the socket write happens later in
/// the connection task, so a slow connection cannot stall matchmaking for
/// anyone else. Enqueueing under the lock keeps each participant's events
/// in the order their state changes were committed.
#[derive(Debug, Clone)]
pub struct PairingService {
    state: Arc<Mutex<MatchmakingState>>,
    rematch_delay: Duration,
}

impl PairingService {
    /// Creates a service with an empty state.
    ///
    /// `rematch_delay` is how long `next-partner` waits before re-entering
    /// matchmaking; zero rematches inline.
    #[must_use]
    pub fn new(rematch_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(MatchmakingState::new())),
            rematch_delay,
        }
    }

    /// Registers a new Idle participant and returns its handle and inbox.
    ///
    /// The first event in the inbox is always `connected`.
    pub async fn connect(&self) -> (ParticipantId, Inbox) {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let mut id = ParticipantId::new();
        {
            let mut state = self.state.lock().await;
            while !state.register(id, outbox.clone()) {
                id = ParticipantId::new();
            }
        }
        let _ = outbox.send(ParticipantEvent::Connected { id });
        (id, inbox)
    }

    /// `find-partner`: pair `id` with the oldest live waiting participant
    /// or enqueue it.
    pub async fn request_partner(&self, id: ParticipantId) {
        self.commit(|state| state.request_partner(id)).await;
    }

    /// Leaves the current pair and the waiting pool.
    pub async fn leave_pair(&self, id: ParticipantId, notify: bool) {
        self.commit(|state| state.leave_pair(id, notify)).await;
    }

    /// `next-partner`: leave now, re-enter matchmaking after the rematch
    /// delay.
    ///
    /// Until the deferred request fires the participant is Idle and receives
    /// no relayed payloads. If it disconnects or asks for a partner itself
    /// in the meantime, the deferred request does nothing.
    pub async fn request_next_partner(&self, id: ParticipantId) {
        self.commit(|state| state.leave_pair(id, true)).await;

        if self.rematch_delay.is_zero() {
            self.commit(|state| state.request_partner_if_idle(id)).await;
            return;
        }

        let service = self.clone();
        let delay = self.rematch_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            service
                .commit(|state| state.request_partner_if_idle(id))
                .await;
        });
    }

    /// Forwards `payload` to `sender`'s partner, or drops it if unpaired.
    pub async fn relay(&self, sender: ParticipantId, payload: RelayPayload) {
        self.commit(|state| state.relay(sender, payload).into_iter().collect())
            .await;
    }

    /// Connection closed: dissolve, notify, forget. Safe to call twice.
    pub async fn disconnect(&self, id: ParticipantId) {
        self.commit(|state| state.disconnect(id)).await;
    }

    /// Returns where `id` sits in matchmaking.
    pub async fn pairing_state(&self, id: ParticipantId) -> Option<PairingState> {
        self.state.lock().await.pairing_state(id)
    }

    /// Returns current counters.
    pub async fn stats(&self) -> MatchmakingStats {
        self.state.lock().await.stats()
    }

    /// Runs `op` under the lock and enqueues its events before unlocking.
    async fn commit<F>(&self, op: F)
    where
        F: FnOnce(&mut MatchmakingState) -> Vec<Outbound>,
    {
        let mut state = self.state.lock().await;
        let outbound = op(&mut state);
        for delivery in state.resolve(outbound) {
            let _ = delivery.deliver();
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    async fn joined(service: &PairingService) -> (ParticipantId, Inbox) {
        let (id, mut inbox) = service.connect().await;
        let Some(ParticipantEvent::Connected { id: announced }) = inbox.recv().await else {
            panic!("first event must be connected");
        };
        assert_eq!(announced, id);
        (id, inbox)
    }

    fn next(inbox: &mut Inbox) -> ParticipantEvent {
        let Ok(event) = inbox.try_recv() else {
            panic!("expected an event");
        };
        event
    }

    #[tokio::test]
    async fn pairing_notifies_both_sides() {
        let service = PairingService::new(Duration::ZERO);
        let (a, mut ia) = joined(&service).await;
        let (b, mut ib) = joined(&service).await;

        service.request_partner(a).await;
        assert_eq!(next(&mut ia), ParticipantEvent::WaitingForPartner);

        service.request_partner(b).await;
        assert_eq!(next(&mut ia), ParticipantEvent::PartnerFound);
        assert_eq!(next(&mut ib), ParticipantEvent::PartnerFound);
        assert_eq!(service.pairing_state(a).await, Some(PairingState::Paired(b)));
    }

    #[tokio::test]
    async fn leave_pair_without_notify_is_silent() {
        let service = PairingService::new(Duration::ZERO);
        let (a, mut ia) = joined(&service).await;
        let (b, mut ib) = joined(&service).await;
        service.request_partner(a).await;
        service.request_partner(b).await;
        let _ = next(&mut ia);
        let _ = next(&mut ia);
        let _ = next(&mut ib);

        service.leave_pair(a, false).await;

        assert!(ib.try_recv().is_err());
        assert_eq!(service.pairing_state(b).await, Some(PairingState::Idle));
        assert_eq!(service.stats().await.pairs, 0);
    }

    #[tokio::test]
    async fn relay_is_isolated_to_the_pair() {
        let service = PairingService::new(Duration::ZERO);
        let (a, mut ia) = joined(&service).await;
        let (b, mut ib) = joined(&service).await;
        let (_c, mut ic) = joined(&service).await;
        service.request_partner(a).await;
        service.request_partner(b).await;
        let _ = next(&mut ia);
        let _ = next(&mut ia);
        let _ = next(&mut ib);

        service.relay(a, RelayPayload::Chat("hello".to_string())).await;

        assert_eq!(next(&mut ib), ParticipantEvent::ReceiveMessage {
            message: "hello".to_string(),
            is_own: false,
        });
        assert!(ia.try_recv().is_err());
        assert!(ic.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_twice_notifies_once() {
        let service = PairingService::new(Duration::ZERO);
        let (a, _ia) = joined(&service).await;
        let (b, mut ib) = joined(&service).await;
        service.request_partner(a).await;
        service.request_partner(b).await;
        let _ = next(&mut ib);

        service.disconnect(a).await;
        service.disconnect(a).await;

        assert_eq!(next(&mut ib), ParticipantEvent::PartnerDisconnected);
        assert!(ib.try_recv().is_err());
        assert_eq!(service.pairing_state(a).await, None);
        assert_eq!(service.pairing_state(b).await, Some(PairingState::Idle));
    }

    #[tokio::test]
    async fn next_partner_inline_rematches() {
        let service = PairingService::new(Duration::ZERO);
        let (a, mut ia) = joined(&service).await;
        let (b, mut ib) = joined(&service).await;
        let (c, _ic) = joined(&service).await;
        service.request_partner(a).await;
        service.request_partner(b).await;
        service.request_partner(c).await;
        let _ = next(&mut ia);
        let _ = next(&mut ia);
        let _ = next(&mut ib);

        service.request_next_partner(a).await;

        assert_eq!(next(&mut ib), ParticipantEvent::PartnerDisconnected);
        assert_eq!(next(&mut ia), ParticipantEvent::PartnerFound);
        assert_eq!(service.pairing_state(a).await, Some(PairingState::Paired(c)));
    }

    #[tokio::test(start_paused = true)]
    async fn next_partner_waits_before_rematching() {
        let service = PairingService::new(Duration::from_millis(1000));
        let (a, mut ia) = joined(&service).await;
        let (b, mut ib) = joined(&service).await;
        service.request_partner(a).await;
        service.request_partner(b).await;
        let _ = next(&mut ia);
        let _ = next(&mut ia);
        let _ = next(&mut ib);

        service.request_next_partner(a).await;
        assert_eq!(next(&mut ib), ParticipantEvent::PartnerDisconnected);
        assert_eq!(service.pairing_state(a).await, Some(PairingState::Idle));

        service.relay(b, RelayPayload::Chat("anyone?".to_string())).await;
        assert!(ia.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(next(&mut ia), ParticipantEvent::WaitingForPartner);
        assert_eq!(service.pairing_state(a).await, Some(PairingState::Waiting));
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_rematch_is_dropped_after_disconnect() {
        let service = PairingService::new(Duration::from_millis(1000));
        let (a, _ia) = joined(&service).await;

        service.request_next_partner(a).await;
        service.disconnect(a).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(service.stats().await, MatchmakingStats {
            participants: 0,
            waiting: 0,
            pairs: 0,
        });
    }

    /// The last event a participant received must describe the state the
    /// server holds for it.
    async fn assert_last_event_matches(service: &PairingService, id: ParticipantId, inbox: &mut Inbox) {
        let mut last = None;
        while let Ok(event) = inbox.try_recv() {
            last = Some(event);
        }
        let expected = match service.pairing_state(id).await {
            Some(PairingState::Paired(_)) => ParticipantEvent::PartnerFound,
            Some(PairingState::Waiting) => ParticipantEvent::WaitingForPartner,
            Some(PairingState::Idle) => ParticipantEvent::PartnerDisconnected,
            None => panic!("participant should still be registered"),
        };
        assert_eq!(last, Some(expected));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_requests_deliver_in_commit_order() {
        for _ in 0..200 {
            let service = PairingService::new(Duration::ZERO);
            let (p, mut ip) = joined(&service).await;
            let (q, mut iq) = joined(&service).await;
            service.request_partner(p).await;

            let from_q = {
                let service = service.clone();
                tokio::spawn(async move { service.request_partner(q).await })
            };
            let from_p = {
                let service = service.clone();
                tokio::spawn(async move { service.request_partner(p).await })
            };
            assert_ok!(from_q.await);
            assert_ok!(from_p.await);

            assert_last_event_matches(&service, p, &mut ip).await;
            assert_last_event_matches(&service, q, &mut iq).await;
        }
    }

    #[tokio::test]
    async fn events_are_enqueued_before_the_call_returns() {
        let service = PairingService::new(Duration::ZERO);
        let (p, mut ip) = joined(&service).await;
        let (q, mut iq) = joined(&service).await;
        service.request_partner(p).await;
        service.request_partner(q).await;

        // P asks again before Q's connection has drained anything.
        service.request_partner(p).await;

        assert_eq!(next(&mut iq), ParticipantEvent::PartnerFound);
        assert_eq!(next(&mut iq), ParticipantEvent::PartnerDisconnected);
        assert!(iq.try_recv().is_err());
        assert_eq!(service.pairing_state(q).await, Some(PairingState::Idle));
        assert_last_event_matches(&service, p, &mut ip).await;
    }

    #[tokio::test]
    async fn concurrent_requests_form_consistent_pairs() {
        let service = PairingService::new(Duration::ZERO);
        let mut ids = Vec::new();
        // Held so every participant stays live.
        let mut inboxes = Vec::new();
        for _ in 0..40 {
            let (id, inbox) = joined(&service).await;
            ids.push(id);
            inboxes.push(inbox);
        }

        let mut tasks = Vec::with_capacity(ids.len());
        for id in &ids {
            let service = service.clone();
            let id = *id;
            tasks.push(tokio::spawn(async move { service.request_partner(id).await }));
        }
        for task in tasks {
            assert_ok!(task.await);
        }

        let stats = service.stats().await;
        assert_eq!(stats.pairs, 20);
        assert_eq!(stats.waiting, 0);
        for id in &ids {
            let Some(PairingState::Paired(partner)) = service.pairing_state(*id).await else {
                panic!("everyone should be paired");
            };
            assert_ne!(partner, *id);
            assert_eq!(
                service.pairing_state(partner).await,
                Some(PairingState::Paired(*id))
            );
        }
    }
}
