//! The transfer request state machine.
//!
//! Validates preconditions (status, actor capability), applies
//! transitions through the store's compare-and-set methods, and fires
//! notification/audit side channels after the state change has been
//! committed. Side-channel failures are logged and never affect the
//! operation result.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use custody_core::error::AppError;
use custody_core::result::AppResult;
use custody_core::types::pagination::{PageRequest, PageResponse};
use custody_entity::notification::NotificationKind;
use custody_entity::transfer::{
    CreateTransfer, DecisionOutcome, NewTransferRequest, StageDecision, TransferHistoryEntry,
    TransferRequest, TransferStatus,
};
use custody_entity::user::Capability;

use crate::context::ActorContext;
use crate::ports::{
    AssetRegistry, AuditPort, IdentityPort, NotificationPort, OwnershipTransactor, SlipNumberPort,
    TransferStore,
};

use super::router::ApprovalRouter;

/// Orchestrates the two-stage transfer approval workflow.
///
/// Holds no mutable state; every operation is an independent unit of
/// work against the ports.
pub struct TransferWorkflowService {
    identity: Arc<dyn IdentityPort>,
    assets: Arc<dyn AssetRegistry>,
    store: Arc<dyn TransferStore>,
    transactor: Arc<dyn OwnershipTransactor>,
    slips: Arc<dyn SlipNumberPort>,
    notifications: Arc<dyn NotificationPort>,
    audit: Arc<dyn AuditPort>,
    router: ApprovalRouter,
}

impl TransferWorkflowService {
    /// Create a new workflow service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Arc<dyn IdentityPort>,
        assets: Arc<dyn AssetRegistry>,
        store: Arc<dyn TransferStore>,
        transactor: Arc<dyn OwnershipTransactor>,
        slips: Arc<dyn SlipNumberPort>,
        notifications: Arc<dyn NotificationPort>,
        audit: Arc<dyn AuditPort>,
    ) -> Self {
        let router = ApprovalRouter::new(identity.clone(), store.clone());
        Self {
            identity,
            assets,
            store,
            transactor,
            slips,
            notifications,
            audit,
            router,
        }
    }

    /// Open a new transfer request.
    ///
    /// Resolves the from-holder (the asset's current holder, or the
    /// requester if unset), freezes both department snapshots, routes the
    /// approvers, assigns a slip number, and stores the request in
    /// `pending_hod`. The designated HoD is notified.
    pub async fn create(
        &self,
        ctx: &ActorContext,
        input: CreateTransfer,
    ) -> AppResult<TransferRequest> {
        if !ctx.has_capability(Capability::RequestTransfer) {
            return Err(AppError::authorization(
                "You may not open transfer requests",
            ));
        }

        let asset = self
            .assets
            .get_asset(input.asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;
        let to_user = self
            .identity
            .get_user(input.to_user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipient user not found"))?;
        if !to_user.is_active() {
            return Err(AppError::validation("Recipient user is not active"));
        }

        let from_user_id = asset.current_holder_id.unwrap_or(ctx.user_id);
        let routing = self.router.route(ctx).await?;
        let slip_number = self.slips.generate_unique_slip().await?;

        let request = self
            .store
            .insert_request(NewTransferRequest {
                asset_id: asset.id,
                from_user_id,
                to_user_id: to_user.id,
                from_department_id: asset.department_id,
                to_department_id: to_user.department_id,
                reason: input.reason,
                hod_id: routing.hod_id,
                supervisor_id: routing.supervisor_id,
                requested_by: ctx.user_id,
                slip_number,
            })
            .await?;

        info!(
            request_id = %request.id,
            slip = %request.slip_number,
            asset = %asset.serial_number,
            "Transfer request created"
        );

        self.audit_best_effort(
            ctx.user_id,
            "transfer.create",
            request.id,
            &format!(
                "Transfer request {} created for asset {}",
                request.slip_number, asset.serial_number
            ),
        )
        .await;

        if let Some(hod_id) = request.hod_id {
            self.notify_best_effort(
                hod_id,
                NotificationKind::TransferRequested,
                "Transfer approval required",
                &format!(
                    "{} has requested to transfer '{}' (slip {}).",
                    ctx.emp_name, asset.description, request.slip_number
                ),
            )
            .await;
        }

        Ok(request)
    }

    /// Decide the first (HoD) approval stage.
    ///
    /// The request must be exactly in `pending_hod`, and the actor must
    /// be the designated HoD or an administrator. Approval advances to
    /// `pending_supervisor`; rejection is terminal.
    pub async fn decide_as_hod(
        &self,
        ctx: &ActorContext,
        request_id: Uuid,
        outcome: DecisionOutcome,
        comments: Option<String>,
    ) -> AppResult<TransferRequest> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Transfer request not found"))?;
        if request.status != TransferStatus::PendingHod {
            return Err(AppError::invalid_transition(format!(
                "Request is not awaiting HoD approval (status: {})",
                request.status
            )));
        }
        let is_designated = request.hod_id == Some(ctx.user_id);
        if !is_designated && !ctx.has_capability(Capability::AdministerTransfers) {
            return Err(AppError::authorization(
                "Only the designated head of department may decide this request",
            ));
        }

        let decision = StageDecision::new(outcome, comments, ctx.user_id);
        let updated = self.store.record_hod_decision(request_id, &decision).await?;

        info!(
            request_id = %updated.id,
            slip = %updated.slip_number,
            outcome = %outcome,
            "HoD stage decided"
        );

        match outcome {
            DecisionOutcome::Approved => {
                self.audit_best_effort(
                    ctx.user_id,
                    "transfer.hod_approve",
                    updated.id,
                    &format!("HoD approved transfer request {}", updated.slip_number),
                )
                .await;
                if let Some(supervisor_id) = updated.supervisor_id {
                    self.notify_best_effort(
                        supervisor_id,
                        NotificationKind::TransferAwaitingSupervisor,
                        "Transfer awaiting final approval",
                        &format!(
                            "Transfer request {} has been approved by the HoD and awaits your final approval.",
                            updated.slip_number
                        ),
                    )
                    .await;
                }
            }
            DecisionOutcome::Rejected => {
                self.audit_best_effort(
                    ctx.user_id,
                    "transfer.hod_reject",
                    updated.id,
                    &format!("HoD rejected transfer request {}", updated.slip_number),
                )
                .await;
                self.notify_best_effort(
                    updated.requested_by,
                    NotificationKind::TransferRejected,
                    "Transfer request rejected",
                    &format!(
                        "Your transfer request {} has been rejected by the HoD. Reason: {}",
                        updated.slip_number,
                        decision.comments.as_deref().unwrap_or("none given")
                    ),
                )
                .await;
            }
        }

        Ok(updated)
    }

    /// Decide the final (supervisor) approval stage.
    ///
    /// The request must be exactly in `pending_supervisor`. Any actor
    /// with supervisor capability may decide — not only the designated
    /// one — so a single absent approver cannot deadlock the chain.
    /// Approval runs the ownership transactor; the request becomes
    /// `completed` only if that transaction commits.
    pub async fn decide_as_supervisor(
        &self,
        ctx: &ActorContext,
        request_id: Uuid,
        outcome: DecisionOutcome,
        comments: Option<String>,
    ) -> AppResult<TransferRequest> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Transfer request not found"))?;
        if request.status != TransferStatus::PendingSupervisor {
            return Err(AppError::invalid_transition(format!(
                "Request is not awaiting supervisor approval (status: {})",
                request.status
            )));
        }
        if !ctx.has_capability(Capability::ApproveAsSupervisor)
            && !ctx.has_capability(Capability::AdministerTransfers)
        {
            return Err(AppError::authorization(
                "Supervisor capability is required for final approval",
            ));
        }

        let decision = StageDecision::new(outcome, comments, ctx.user_id);

        match outcome {
            DecisionOutcome::Rejected => {
                let updated = self
                    .store
                    .record_supervisor_rejection(request_id, &decision)
                    .await?;
                info!(
                    request_id = %updated.id,
                    slip = %updated.slip_number,
                    "Supervisor rejected transfer"
                );
                self.audit_best_effort(
                    ctx.user_id,
                    "transfer.supervisor_reject",
                    updated.id,
                    &format!(
                        "Supervisor rejected transfer request {}",
                        updated.slip_number
                    ),
                )
                .await;
                self.notify_best_effort(
                    updated.requested_by,
                    NotificationKind::TransferRejected,
                    "Transfer request rejected",
                    &format!(
                        "Your transfer request {} was rejected by the supervisor. Reason: {}",
                        updated.slip_number,
                        decision.comments.as_deref().unwrap_or("none given")
                    ),
                )
                .await;
                Ok(updated)
            }
            DecisionOutcome::Approved => {
                let completed = self
                    .transactor
                    .complete_transfer(request_id, &decision)
                    .await?;
                info!(
                    request_id = %completed.request.id,
                    slip = %completed.request.slip_number,
                    new_holder = %completed.history.to_user_name,
                    kind = %completed.history.transfer_kind,
                    "Transfer completed"
                );

                self.audit_best_effort(
                    ctx.user_id,
                    "transfer.supervisor_approve",
                    completed.request.id,
                    &format!(
                        "Supervisor approved and completed transfer {}",
                        completed.request.slip_number
                    ),
                )
                .await;

                self.notify_best_effort(
                    completed.request.to_user_id,
                    NotificationKind::TransferCompleted,
                    "Item transferred to you",
                    &format!(
                        "The item '{}' (serial {}) has been transferred to you.",
                        completed.asset.description, completed.asset.serial_number
                    ),
                )
                .await;
                // The new holder's HoD learns about incoming team assets.
                match self.identity.get_user(completed.request.to_user_id).await {
                    Ok(Some(to_user)) => {
                        if let Some(hod_id) = to_user.hod_id {
                            self.notify_best_effort(
                                hod_id,
                                NotificationKind::TransferIncoming,
                                "Incoming transfer to your team",
                                &format!(
                                    "Item '{}' has been transferred to {} in your department.",
                                    completed.asset.description, to_user.emp_name
                                ),
                            )
                            .await;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(error = %e, "Failed to resolve new holder for notification");
                    }
                }
                self.notify_best_effort(
                    completed.request.requested_by,
                    NotificationKind::TransferCompleted,
                    "Transfer completed",
                    "Your transfer request has been approved and completed.",
                )
                .await;

                Ok(completed.request)
            }
        }
    }

    /// Fetch a single request, enforcing visibility.
    pub async fn get_request(
        &self,
        ctx: &ActorContext,
        request_id: Uuid,
    ) -> AppResult<TransferRequest> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Transfer request not found"))?;
        if !Self::can_view(ctx, &request) {
            return Err(AppError::authorization(
                "You are not involved in this transfer request",
            ));
        }
        Ok(request)
    }

    /// List requests visible to the actor, optionally filtered by status.
    pub async fn list_for_actor(
        &self,
        ctx: &ActorContext,
        status: Option<TransferStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferRequest>> {
        self.store.list_for_actor(ctx, status, page).await
    }

    /// Custody ledger for an asset, newest first.
    pub async fn history_for_asset(
        &self,
        asset_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferHistoryEntry>> {
        self.assets
            .get_asset(asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;
        self.store.history_for_asset(asset_id, page).await
    }

    fn can_view(ctx: &ActorContext, request: &TransferRequest) -> bool {
        ctx.has_capability(Capability::AdministerTransfers)
            || ctx.has_capability(Capability::ApproveAsSupervisor)
            || request.requested_by == ctx.user_id
            || request.from_user_id == ctx.user_id
            || request.to_user_id == ctx.user_id
            || request.hod_id == Some(ctx.user_id)
            || request.supervisor_id == Some(ctx.user_id)
    }

    async fn notify_best_effort(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        subject: &str,
        body: &str,
    ) {
        if let Err(e) = self.notifications.notify(user_id, kind, subject, body).await {
            warn!(error = %e, recipient = %user_id, kind = %kind, "Failed to deliver notification");
        }
    }

    async fn audit_best_effort(
        &self,
        actor_id: Uuid,
        action: &str,
        request_id: Uuid,
        description: &str,
    ) {
        if let Err(e) = self
            .audit
            .record(actor_id, action, "transfer_request", request_id, description)
            .await
        {
            warn!(error = %e, action = %action, "Failed to record audit entry");
        }
    }
}
