//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The workflow event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new request awaits the recipient's HoD approval.
    TransferRequested,
    /// A HoD-approved request awaits supervisor approval.
    TransferAwaitingSupervisor,
    /// A request was rejected at either stage.
    TransferRejected,
    /// A request completed; ownership has changed.
    TransferCompleted,
    /// An asset was transferred into the recipient's team.
    TransferIncoming,
}

impl NotificationKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransferRequested => "transfer_requested",
            Self::TransferAwaitingSupervisor => "transfer_awaiting_supervisor",
            Self::TransferRejected => "transfer_rejected",
            Self::TransferCompleted => "transfer_completed",
            Self::TransferIncoming => "transfer_incoming",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
