//! Boundary ports consumed by the transfer workflow.
//!
//! The workflow core holds no in-process state and talks to the outside
//! world exclusively through these traits. Postgres implementations live
//! in [`crate::postgres`]; tests drive the workflow through in-memory
//! fakes.

use async_trait::async_trait;
use uuid::Uuid;

use custody_core::result::AppResult;
use custody_core::types::pagination::{PageRequest, PageResponse};
use custody_entity::asset::Asset;
use custody_entity::notification::NotificationKind;
use custody_entity::transfer::{
    CompletedTransfer, NewTransferRequest, StageDecision, TransferHistoryEntry, TransferRequest,
    TransferStatus,
};
use custody_entity::user::User;

use crate::context::ActorContext;

/// Read access to user identities and approver candidates.
#[async_trait]
pub trait IdentityPort: Send + Sync {
    /// Fetch a user by ID.
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// All active users eligible to give final approval.
    async fn active_supervisors(&self) -> AppResult<Vec<User>>;
}

/// Read access to the asset registry.
///
/// Ownership writes are deliberately absent: the asset's holder and
/// department are mutated only inside [`OwnershipTransactor`].
#[async_trait]
pub trait AssetRegistry: Send + Sync {
    /// Fetch an asset by ID.
    async fn get_asset(&self, id: Uuid) -> AppResult<Option<Asset>>;
}

/// Persistence for transfer requests and the history ledger.
///
/// Every transition method is compare-and-set on the expected pre-state:
/// the status check and the write happen in the same statement, so two
/// concurrent decisions on one request can never both succeed. A lost
/// race surfaces as `InvalidTransition`.
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Insert a new request in `pending_hod`. Fails with `Conflict` if the
    /// asset already has an active request; the check is enforced
    /// atomically so concurrent creates cannot both succeed.
    async fn insert_request(&self, request: NewTransferRequest) -> AppResult<TransferRequest>;

    /// Fetch a request by ID.
    async fn get_request(&self, id: Uuid) -> AppResult<Option<TransferRequest>>;

    /// List requests visible to the actor, optionally filtered by status.
    async fn list_for_actor(
        &self,
        actor: &ActorContext,
        status: Option<TransferStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferRequest>>;

    /// Record the HoD stage decision. Approve moves the request to
    /// `pending_supervisor`, reject to `rejected`; both require the row to
    /// still be in `pending_hod`.
    async fn record_hod_decision(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest>;

    /// Record a supervisor rejection. Requires `pending_supervisor`.
    /// Approval goes through [`OwnershipTransactor`] instead.
    async fn record_supervisor_rejection(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest>;

    /// Ledger entries for an asset, newest first.
    async fn history_for_asset(
        &self,
        asset_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferHistoryEntry>>;

    /// Number of active requests designated to the given supervisor.
    /// Used by the approval router's least-loaded selection.
    async fn count_active_for_supervisor(&self, supervisor_id: Uuid) -> AppResult<u64>;

    /// Whether a slip number is already taken.
    async fn slip_exists(&self, slip_number: &str) -> AppResult<bool>;
}

/// Applies the irreversible effect of a final approval as one
/// all-or-nothing unit.
///
/// Within a single transaction: re-verify the request is still in
/// `pending_supervisor`, move it to `completed`, reassign the asset's
/// holder and department, and append exactly one ledger entry capturing
/// both endpoints' names as they exist at that moment. Any failure rolls
/// the whole unit back and leaves the request in `pending_supervisor`,
/// safe to retry.
#[async_trait]
pub trait OwnershipTransactor: Send + Sync {
    /// Execute the completion transaction.
    async fn complete_transfer(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<CompletedTransfer>;
}

/// Source of unique, immutable transfer slip numbers.
#[async_trait]
pub trait SlipNumberPort: Send + Sync {
    /// Generate a slip number guaranteed not to collide with any
    /// existing request.
    async fn generate_unique_slip(&self) -> AppResult<String>;
}

/// Best-effort notification side channel.
///
/// Failures are logged by the workflow and never abort or roll back a
/// transition.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Deliver a notification to a user.
    async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        subject: &str,
        body: &str,
    ) -> AppResult<()>;
}

/// [`NotificationPort`] that drops everything, used when notifications
/// are disabled in configuration.
pub struct DisabledNotifications;

#[async_trait]
impl NotificationPort for DisabledNotifications {
    async fn notify(
        &self,
        _user_id: Uuid,
        _kind: NotificationKind,
        _subject: &str,
        _body: &str,
    ) -> AppResult<()> {
        Ok(())
    }
}

/// Best-effort audit trail side channel.
#[async_trait]
pub trait AuditPort: Send + Sync {
    /// Record an action against an entity.
    async fn record(
        &self,
        actor_id: Uuid,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        description: &str,
    ) -> AppResult<()>;
}
