//! Domain layer: participant identity, registry, waiting pool, pair
//! mapping, and the matchmaking state machine that ties them together.
//!
//! Nothing in here locks or performs I/O. Operations return addressed
//! [`Outbound`] events that the service layer delivers.

pub mod active_pairs;
pub mod matchmaking;
pub mod outbound;
pub mod participant;
pub mod participant_event;
pub mod participant_id;
pub mod participant_registry;
pub mod relay;
pub mod waiting_pool;

pub use active_pairs::ActivePairs;
pub use matchmaking::{MatchmakingState, MatchmakingStats};
pub use outbound::{Delivery, Outbound};
pub use participant::{Outbox, PairingState, Participant};
pub use participant_event::ParticipantEvent;
pub use participant_id::ParticipantId;
pub use participant_registry::ParticipantRegistry;
pub use relay::{RelayKind, RelayPayload};
pub use waiting_pool::WaitingPool;
