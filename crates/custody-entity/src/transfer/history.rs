//! Append-only transfer history ledger entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::asset::Asset;

use super::request::TransferRequest;

/// Classification of a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// Both endpoints are in the same department.
    IntraDepartment,
    /// The asset changed departments.
    InterDepartment,
}

impl TransferKind {
    /// Classify a transfer from its frozen department snapshots.
    ///
    /// Two missing departments compare equal, so an asset with no
    /// department moving to a user with no department stays intra.
    pub fn classify(from_department: Option<Uuid>, to_department: Option<Uuid>) -> Self {
        if from_department == to_department {
            Self::IntraDepartment
        } else {
            Self::InterDepartment
        }
    }

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntraDepartment => "intra_department",
            Self::InterDepartment => "inter_department",
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable row in the custody ledger.
///
/// Holder and department display names are captured at completion time so
/// the ledger stays readable even if the referenced user or department is
/// later renamed or deleted. Entries are never updated or deleted; the
/// ledger is the sole source of truth for past custody.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransferHistoryEntry {
    /// Unique ledger entry identifier.
    pub id: Uuid,
    /// The transferred asset.
    pub asset_id: Uuid,
    /// The request that produced this entry.
    pub transfer_request_id: Uuid,
    /// The holder who gave up the asset.
    pub from_user_id: Uuid,
    /// The holder who received the asset.
    pub to_user_id: Uuid,
    /// Origin department reference.
    pub from_department_id: Option<Uuid>,
    /// Destination department reference.
    pub to_department_id: Option<Uuid>,
    /// Origin holder's name at completion time.
    pub from_user_name: String,
    /// Destination holder's name at completion time.
    pub to_user_name: String,
    /// Origin department's name at completion time.
    pub from_department_name: String,
    /// Destination department's name at completion time.
    pub to_department_name: String,
    /// Intra- vs inter-department classification.
    pub transfer_kind: TransferKind,
    /// Slip number carried over from the request.
    pub slip_number: String,
    /// Final supervisor comment.
    pub remarks: Option<String>,
    /// When the transfer completed.
    pub transferred_at: DateTime<Utc>,
}

/// Result of a successfully committed ownership transfer.
#[derive(Debug, Clone)]
pub struct CompletedTransfer {
    /// The request, now in `completed` status.
    pub request: TransferRequest,
    /// The ledger entry written in the same transaction.
    pub history: TransferHistoryEntry,
    /// The asset with its reassigned holder and department.
    pub asset: Asset,
}
