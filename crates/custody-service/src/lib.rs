//! # custody-service
//!
//! The transfer approval workflow: actor context, boundary ports, the
//! state machine that validates and applies transitions, approval
//! routing, and slip number generation. Postgres implementations of the
//! ports (backed by `custody-database`) live in [`postgres`].

pub mod context;
pub mod ports;
pub mod postgres;
pub mod transfer;

pub use context::ActorContext;
