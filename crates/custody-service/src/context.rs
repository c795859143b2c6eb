//! Actor context carrying the resolved identity and capability set.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use custody_entity::user::{Capability, User, UserRole};

/// The acting user for a workflow operation.
///
/// Resolved by the boundary (HTTP layer, CLI, test harness) and passed
/// explicitly into every operation — actor identity is never read from
/// ambient state. The capability set is derived from the role at
/// resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting user's ID.
    pub user_id: Uuid,
    /// Login name (for logging).
    pub username: String,
    /// Employee display name (used in notification bodies).
    pub emp_name: String,
    /// The actor's role, from which capabilities derive.
    pub role: UserRole,
    /// The actor's department.
    pub department_id: Option<Uuid>,
    /// The actor's configured head of department.
    pub hod_id: Option<Uuid>,
}

impl ActorContext {
    /// Build a context from a resolved user record.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            emp_name: user.emp_name.clone(),
            role: user.role,
            department_id: user.department_id,
            hod_id: user.hod_id,
        }
    }

    /// Check whether the actor holds the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.role.has_capability(capability)
    }

    /// Whether the actor may override approval stages.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
