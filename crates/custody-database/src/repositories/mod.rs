//! Concrete repository implementations, one per table.

pub mod asset;
pub mod audit;
pub mod notification;
pub mod transfer_history;
pub mod transfer_request;
pub mod user;
