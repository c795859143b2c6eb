//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log entry recording a workflow action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// The action that was performed (e.g., `"transfer.create"`).
    pub action: String,
    /// The type of target entity (e.g., `"transfer_request"`).
    pub entity_type: String,
    /// The target entity ID.
    pub entity_id: Uuid,
    /// Human-readable description of what happened.
    pub description: String,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}
