//! # tandem-gateway
//!
//! Matchmaking and signaling relay for anonymous one-to-one audio/video/text
//! sessions.
//!
//! Participants connect over WebSocket, ask for a partner, and are paired
//! first-come first-served. Once paired, session negotiation payloads
//! (offer, answer, candidates) and chat text are relayed verbatim between
//! the two members of the pair and nobody else. Media flows directly
//! between the clients and never touches this service.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + connection loop (ws/)
//!     ├── Health / OpenAPI (api/)
//!     │
//!     ├── PairingService (service/)      one mutex, enqueue in commit order
//!     │
//!     └── MatchmakingState (domain/)
//!           ├── ParticipantRegistry
//!           ├── WaitingPool (FIFO)
//!           └── ActivePairs (symmetric)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete router: HTTP API, `/ws`, optional static client.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
