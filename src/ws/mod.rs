//! WebSocket layer: upgrade handler, per-connection loop, wire types.
//!
//! The endpoint at `/ws` is the signaling channel. Opening it registers a
//! participant; closing it disconnects that participant.

pub mod connection;
pub mod handler;
pub mod messages;
