//! Shared types used across CustodyTrack crates.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
