//! Audit log domain entities.

pub mod model;

pub use model::AuditLogEntry;
