//! # custody-api
//!
//! HTTP API layer for CustodyTrack built on Axum.
//!
//! Exposes the transfer workflow operation surface: create transfer,
//! HoD decision, supervisor decision, get request, list requests, and
//! per-asset custody history. Authentication is handled upstream; the
//! acting identity arrives resolved via the `X-Actor-Id` header.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
