//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::capability::Capability;

/// Roles available in CustodyTrack.
///
/// Note that the HoD role only marks the user as *eligible* to head a
/// department; the first approval stage is gated on the specific HoD
/// designated on the request, not on this role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system administrator.
    Admin,
    /// Gives the final approval on transfer requests.
    Supervisor,
    /// Head of department, first-stage approver for their staff.
    Hod,
    /// Regular staff member holding assets.
    Employee,
}

impl UserRole {
    /// Return the capability set granted by this role.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Admin => &[
                Capability::RequestTransfer,
                Capability::ApproveAsSupervisor,
                Capability::AdministerTransfers,
            ],
            Self::Supervisor => &[
                Capability::RequestTransfer,
                Capability::ApproveAsSupervisor,
            ],
            Self::Hod | Self::Employee => &[Capability::RequestTransfer],
        }
    }

    /// Check whether this role grants the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Hod => "hod",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = custody_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "hod" => Ok(Self::Hod),
            "employee" => Ok(Self::Employee),
            _ => Err(custody_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, supervisor, hod, employee"
            ))),
        }
    }
}
