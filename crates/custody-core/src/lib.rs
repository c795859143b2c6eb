//! # custody-core
//!
//! Core crate for CustodyTrack. Contains configuration schemas, shared
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other CustodyTrack crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
