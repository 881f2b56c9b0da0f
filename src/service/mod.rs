//! Service layer: the single synchronization boundary around matchmaking.
//!
//! [`PairingService`] serializes every operation on
//! [`crate::domain::MatchmakingState`] and delivers the resulting events
//! once the lock is released.

pub mod pairing_service;

pub use pairing_service::{Inbox, PairingService};
