//! frame-api: HTTP API layer for the frame
//!
//! Serves the frame manifest, read-only protocol views, wallet session
//! control, and operation submission backed by the transaction orchestrator.

pub mod dto;
pub mod ops;
pub mod positions;
pub mod routes;
pub mod server;
pub mod state;

pub use positions::Positions;
pub use server::*;
pub use state::AppState;
