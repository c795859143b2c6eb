//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::capability::Capability;
use super::role::UserRole;
use super::status::UserStatus;

/// A registered user in CustodyTrack.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Employee display name.
    pub emp_name: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// User role.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Department the user belongs to.
    pub department_id: Option<Uuid>,
    /// The user's configured head of department.
    pub hod_id: Option<Uuid>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account is active.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Check whether the user's role grants the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.role.has_capability(capability)
    }
}
