//! Transfer request status enumeration and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a transfer request.
///
/// The legal transitions form a fixed two-stage approval chain:
///
/// ```text
/// pending_hod ──▶ pending_supervisor ──▶ completed
///      │                   │
///      └──────▶ rejected ◀─┘
/// ```
///
/// `completed` and `rejected` are terminal; a rejected request is never
/// re-opened — a new request must be created instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Awaiting the designated head of department (initial state).
    PendingHod,
    /// HoD approved; awaiting final supervisor approval.
    PendingSupervisor,
    /// Supervisor approved; ownership has been reassigned.
    Completed,
    /// Rejected at either stage.
    Rejected,
}

impl TransferStatus {
    /// Whether this status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Whether a request in this status counts against the
    /// one-active-request-per-asset invariant.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether a transition from this status to `next` is legal.
    pub fn can_transition_to(&self, next: TransferStatus) -> bool {
        matches!(
            (self, next),
            (Self::PendingHod, Self::PendingSupervisor)
                | (Self::PendingHod, Self::Rejected)
                | (Self::PendingSupervisor, Self::Completed)
                | (Self::PendingSupervisor, Self::Rejected)
        )
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingHod => "pending_hod",
            Self::PendingSupervisor => "pending_supervisor",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransferStatus {
    type Err = custody_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending_hod" => Ok(Self::PendingHod),
            "pending_supervisor" => Ok(Self::PendingSupervisor),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(custody_core::AppError::validation(format!(
                "Invalid transfer status: '{s}'"
            ))),
        }
    }
}
