//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use custody_entity::transfer::{DecisionOutcome, TransferStatus};

/// Body for `POST /api/transfers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    /// The asset to transfer.
    pub asset_id: Uuid,
    /// The intended new holder.
    pub to_user_id: Uuid,
    /// Free-text reason.
    pub reason: String,
}

/// An approve/reject action as submitted by an approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    /// Accept this stage.
    Approve,
    /// Decline this stage (terminal).
    Reject,
}

impl From<DecisionAction> for DecisionOutcome {
    fn from(action: DecisionAction) -> Self {
        match action {
            DecisionAction::Approve => DecisionOutcome::Approved,
            DecisionAction::Reject => DecisionOutcome::Rejected,
        }
    }
}

/// Body for the two decision endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Approve or reject.
    pub action: DecisionAction,
    /// Optional approver comment.
    pub comments: Option<String>,
}

/// Query parameters for `GET /api/transfers`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferListQuery {
    /// Optional status filter.
    pub status: Option<TransferStatus>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}
