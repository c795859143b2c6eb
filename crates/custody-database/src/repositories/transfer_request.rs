//! Transfer request repository implementation.
//!
//! Every transition is expressed as a compare-and-set `UPDATE` guarded on
//! the expected pre-state, so the precondition check and the write happen
//! in the same statement. A lost race surfaces as zero updated rows and
//! is mapped to `InvalidTransition`.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use custody_core::error::{AppError, ErrorKind};
use custody_core::result::AppResult;
use custody_core::types::pagination::{PageRequest, PageResponse};
use custody_entity::transfer::{
    DecisionOutcome, NewTransferRequest, StageDecision, TransferRequest, TransferStatus,
};
use custody_entity::user::UserRole;

/// Name of the partial unique index enforcing one active request per asset.
const ACTIVE_REQUEST_INDEX: &str = "uq_transfer_requests_active_asset";

/// Repository for transfer request persistence.
#[derive(Debug, Clone)]
pub struct TransferRequestRepository {
    pool: PgPool,
}

impl TransferRequestRepository {
    /// Create a new transfer request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new request in `pending_hod`.
    ///
    /// The one-active-request-per-asset invariant is enforced by a
    /// partial unique index, so two concurrent inserts for the same asset
    /// cannot both commit; the loser gets `Conflict`.
    pub async fn insert(&self, request: NewTransferRequest) -> AppResult<TransferRequest> {
        sqlx::query_as::<_, TransferRequest>(
            "INSERT INTO transfer_requests \
             (asset_id, from_user_id, to_user_id, from_department_id, to_department_id, \
              reason, status, hod_id, supervisor_id, requested_by, slip_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING *",
        )
        .bind(request.asset_id)
        .bind(request.from_user_id)
        .bind(request.to_user_id)
        .bind(request.from_department_id)
        .bind(request.to_department_id)
        .bind(&request.reason)
        .bind(TransferStatus::PendingHod)
        .bind(request.hod_id)
        .bind(request.supervisor_id)
        .bind(request.requested_by)
        .bind(&request.slip_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.constraint() == Some(ACTIVE_REQUEST_INDEX) {
                    return AppError::conflict("Asset already has an active transfer request");
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to insert transfer request", e)
        })
    }

    /// Find a request by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TransferRequest>> {
        sqlx::query_as::<_, TransferRequest>("SELECT * FROM transfer_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find transfer request", e)
            })
    }

    /// List requests visible to the given actor, optionally filtered by
    /// status, newest first.
    ///
    /// Visibility mirrors the workflow's role scoping: admins see
    /// everything, supervisors see the queue awaiting final approval plus
    /// requests they are party to, HoDs see requests they gate plus their
    /// own, employees only requests they are party to.
    pub async fn list_visible(
        &self,
        actor_id: Uuid,
        role: UserRole,
        status: Option<TransferStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferRequest>> {
        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM transfer_requests WHERE ");
        push_scope(&mut count_qb, actor_id, role);
        push_status_filter(&mut count_qb, status);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count transfer requests", e)
            })?;

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM transfer_requests WHERE ");
        push_scope(&mut qb, actor_id, role);
        push_status_filter(&mut qb, status);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let items = qb
            .build_query_as::<TransferRequest>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list transfer requests", e)
            })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Compare-and-set the HoD stage decision on a `pending_hod` request.
    pub async fn record_hod_decision(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest> {
        let new_status = match decision.outcome {
            DecisionOutcome::Approved => TransferStatus::PendingSupervisor,
            DecisionOutcome::Rejected => TransferStatus::Rejected,
        };

        sqlx::query_as::<_, TransferRequest>(
            "UPDATE transfer_requests \
             SET status = $2, hod_action = $3, hod_comments = $4, \
                 hod_action_by = $5, hod_action_at = $6 \
             WHERE id = $1 AND status = 'pending_hod' \
             RETURNING *",
        )
        .bind(request_id)
        .bind(new_status)
        .bind(decision.outcome)
        .bind(&decision.comments)
        .bind(decision.decided_by)
        .bind(decision.decided_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record HoD decision", e)
        })?
        .ok_or_else(|| {
            AppError::invalid_transition("Request is no longer awaiting HoD approval")
        })
    }

    /// Compare-and-set a supervisor rejection on a `pending_supervisor`
    /// request. Supervisor approval runs through the ownership transactor
    /// instead, so the status write and the ownership change share one
    /// transaction.
    pub async fn record_supervisor_rejection(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest> {
        sqlx::query_as::<_, TransferRequest>(
            "UPDATE transfer_requests \
             SET status = 'rejected', supervisor_action = $2, supervisor_comments = $3, \
                 supervisor_action_by = $4, supervisor_action_at = $5 \
             WHERE id = $1 AND status = 'pending_supervisor' \
             RETURNING *",
        )
        .bind(request_id)
        .bind(decision.outcome)
        .bind(&decision.comments)
        .bind(decision.decided_by)
        .bind(decision.decided_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to record supervisor rejection",
                e,
            )
        })?
        .ok_or_else(|| {
            AppError::invalid_transition("Request is no longer awaiting supervisor approval")
        })
    }

    /// Number of active requests designated to a supervisor.
    pub async fn count_active_for_supervisor(&self, supervisor_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transfer_requests \
             WHERE supervisor_id = $1 AND status IN ('pending_hod', 'pending_supervisor')",
        )
        .bind(supervisor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active requests", e)
        })?;
        Ok(count as u64)
    }

    /// Whether a slip number is already taken.
    pub async fn slip_exists(&self, slip_number: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM transfer_requests WHERE slip_number = $1)",
        )
        .bind(slip_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check slip number", e)
        })
    }
}

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, actor_id: Uuid, role: UserRole) {
    match role {
        UserRole::Admin => {
            qb.push("TRUE");
        }
        UserRole::Supervisor => {
            qb.push("(status = 'pending_supervisor' OR supervisor_id = ")
                .push_bind(actor_id)
                .push(" OR requested_by = ")
                .push_bind(actor_id)
                .push(" OR from_user_id = ")
                .push_bind(actor_id)
                .push(" OR to_user_id = ")
                .push_bind(actor_id)
                .push(")");
        }
        UserRole::Hod => {
            qb.push("(hod_id = ")
                .push_bind(actor_id)
                .push(" OR requested_by = ")
                .push_bind(actor_id)
                .push(" OR from_user_id = ")
                .push_bind(actor_id)
                .push(" OR to_user_id = ")
                .push_bind(actor_id)
                .push(")");
        }
        UserRole::Employee => {
            qb.push("(requested_by = ")
                .push_bind(actor_id)
                .push(" OR from_user_id = ")
                .push_bind(actor_id)
                .push(" OR to_user_id = ")
                .push_bind(actor_id)
                .push(")");
        }
    }
}

fn push_status_filter(qb: &mut QueryBuilder<'_, Postgres>, status: Option<TransferStatus>) {
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status);
    }
}
