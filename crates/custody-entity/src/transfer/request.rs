//! Transfer request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::decision::DecisionOutcome;
use super::status::TransferStatus;

/// A custody transfer request moving through the two-stage approval chain.
///
/// Department references are denormalized snapshots taken at creation
/// time and never recomputed, so a request keeps describing the transfer
/// as it was proposed even if the asset or users move around later.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransferRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The asset being transferred.
    pub asset_id: Uuid,
    /// The holder giving up the asset.
    pub from_user_id: Uuid,
    /// The intended new holder.
    pub to_user_id: Uuid,
    /// Department snapshot of the asset at creation time.
    pub from_department_id: Option<Uuid>,
    /// Department snapshot of the recipient at creation time.
    pub to_department_id: Option<Uuid>,
    /// Free-text reason for the transfer.
    pub reason: String,
    /// Current workflow status.
    pub status: TransferStatus,
    /// The designated first-stage approver (requester's HoD).
    pub hod_id: Option<Uuid>,
    /// The designated second-stage approver. Informational only: any
    /// supervisor-capable actor may give the final approval.
    pub supervisor_id: Option<Uuid>,
    /// The user who opened the request.
    pub requested_by: Uuid,
    /// Unique human-readable slip number, assigned once at creation.
    pub slip_number: String,
    /// HoD stage outcome.
    pub hod_action: Option<DecisionOutcome>,
    /// HoD stage comment.
    pub hod_comments: Option<String>,
    /// The user who actually decided the HoD stage (designated HoD or admin).
    pub hod_action_by: Option<Uuid>,
    /// When the HoD stage was decided.
    pub hod_action_at: Option<DateTime<Utc>>,
    /// Supervisor stage outcome.
    pub supervisor_action: Option<DecisionOutcome>,
    /// Supervisor stage comment.
    pub supervisor_comments: Option<String>,
    /// The user who actually decided the supervisor stage.
    pub supervisor_action_by: Option<Uuid>,
    /// When the supervisor stage was decided.
    pub supervisor_action_at: Option<DateTime<Utc>>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request reached `completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TransferRequest {
    /// Whether the request is still awaiting a decision.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Caller input for opening a transfer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransfer {
    /// The asset to transfer.
    pub asset_id: Uuid,
    /// The intended new holder.
    pub to_user_id: Uuid,
    /// Free-text reason for the transfer.
    pub reason: String,
}

/// A fully-resolved request ready for insertion, produced by the workflow
/// after routing and snapshotting.
#[derive(Debug, Clone)]
pub struct NewTransferRequest {
    /// The asset being transferred.
    pub asset_id: Uuid,
    /// The resolved current holder (or the requester if the asset has none).
    pub from_user_id: Uuid,
    /// The intended new holder.
    pub to_user_id: Uuid,
    /// Department snapshot of the asset.
    pub from_department_id: Option<Uuid>,
    /// Department snapshot of the recipient.
    pub to_department_id: Option<Uuid>,
    /// Free-text reason.
    pub reason: String,
    /// Designated first-stage approver.
    pub hod_id: Option<Uuid>,
    /// Designated second-stage approver.
    pub supervisor_id: Option<Uuid>,
    /// The requesting user.
    pub requested_by: Uuid,
    /// Generated unique slip number.
    pub slip_number: String,
}
