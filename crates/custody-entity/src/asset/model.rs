//! Asset entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A physical item whose custody is tracked.
///
/// `current_holder_id` and `department_id` are mutated exclusively by the
/// ownership transactor when a transfer completes; no other code path
/// writes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    /// Unique asset identifier.
    pub id: Uuid,
    /// Unique human-readable serial number.
    pub serial_number: String,
    /// Free-text item description.
    pub description: String,
    /// The user currently holding the asset.
    pub current_holder_id: Option<Uuid>,
    /// The department the asset currently belongs to.
    pub department_id: Option<Uuid>,
    /// When the asset was registered.
    pub created_at: DateTime<Utc>,
    /// When the asset record was last updated.
    pub updated_at: DateTime<Utc>,
}
