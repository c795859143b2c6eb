//! Postgres implementations of the workflow ports, delegating to the
//! concrete repositories in `custody-database`.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use custody_core::result::AppResult;
use custody_core::types::pagination::{PageRequest, PageResponse};
use custody_database::PgOwnershipTransactor;
use custody_database::repositories::asset::AssetRepository;
use custody_database::repositories::audit::AuditLogRepository;
use custody_database::repositories::notification::NotificationRepository;
use custody_database::repositories::transfer_history::TransferHistoryRepository;
use custody_database::repositories::transfer_request::TransferRequestRepository;
use custody_database::repositories::user::UserRepository;
use custody_entity::asset::Asset;
use custody_entity::notification::NotificationKind;
use custody_entity::transfer::{
    CompletedTransfer, NewTransferRequest, StageDecision, TransferHistoryEntry, TransferRequest,
    TransferStatus,
};
use custody_entity::user::User;

use crate::context::ActorContext;
use crate::ports::{
    AssetRegistry, AuditPort, IdentityPort, NotificationPort, OwnershipTransactor,
    TransferStore,
};

/// Bundles the request repository and the history ledger behind the
/// [`TransferStore`] port.
#[derive(Debug, Clone)]
pub struct PgTransferStore {
    requests: TransferRequestRepository,
    history: TransferHistoryRepository,
}

impl PgTransferStore {
    /// Create a new store over both repositories.
    pub fn new(requests: TransferRequestRepository, history: TransferHistoryRepository) -> Self {
        Self { requests, history }
    }
}

#[async_trait]
impl TransferStore for PgTransferStore {
    async fn insert_request(&self, request: NewTransferRequest) -> AppResult<TransferRequest> {
        self.requests.insert(request).await
    }

    async fn get_request(&self, id: Uuid) -> AppResult<Option<TransferRequest>> {
        self.requests.find_by_id(id).await
    }

    async fn list_for_actor(
        &self,
        actor: &ActorContext,
        status: Option<TransferStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferRequest>> {
        self.requests
            .list_visible(actor.user_id, actor.role, status, page)
            .await
    }

    async fn record_hod_decision(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest> {
        self.requests.record_hod_decision(request_id, decision).await
    }

    async fn record_supervisor_rejection(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest> {
        self.requests
            .record_supervisor_rejection(request_id, decision)
            .await
    }

    async fn history_for_asset(
        &self,
        asset_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferHistoryEntry>> {
        self.history.find_by_asset(asset_id, page).await
    }

    async fn count_active_for_supervisor(&self, supervisor_id: Uuid) -> AppResult<u64> {
        self.requests.count_active_for_supervisor(supervisor_id).await
    }

    async fn slip_exists(&self, slip_number: &str) -> AppResult<bool> {
        self.requests.slip_exists(slip_number).await
    }
}

#[async_trait]
impl IdentityPort for UserRepository {
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn active_supervisors(&self) -> AppResult<Vec<User>> {
        UserRepository::active_supervisors(self).await
    }
}

#[async_trait]
impl AssetRegistry for AssetRepository {
    async fn get_asset(&self, id: Uuid) -> AppResult<Option<Asset>> {
        self.find_by_id(id).await
    }
}

#[async_trait]
impl OwnershipTransactor for PgOwnershipTransactor {
    async fn complete_transfer(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<CompletedTransfer> {
        self.complete(request_id, decision).await
    }
}

#[async_trait]
impl NotificationPort for NotificationRepository {
    async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        subject: &str,
        body: &str,
    ) -> AppResult<()> {
        debug!(recipient = %user_id, kind = %kind, subject, "Persisting notification");
        self.insert(user_id, kind.as_str(), subject, body).await?;
        Ok(())
    }
}

#[async_trait]
impl AuditPort for AuditLogRepository {
    async fn record(
        &self,
        actor_id: Uuid,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        description: &str,
    ) -> AppResult<()> {
        self.insert(actor_id, action, entity_type, entity_id, description)
            .await?;
        Ok(())
    }
}
