//! The ownership transactor: applies a final approval as one
//! all-or-nothing transaction.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use custody_core::error::{AppError, ErrorKind};
use custody_core::result::AppResult;
use custody_entity::asset::Asset;
use custody_entity::transfer::{
    CompletedTransfer, StageDecision, TransferHistoryEntry, TransferKind, TransferRequest,
};

/// Display-name fallback when a referenced user or department is gone.
const UNKNOWN_NAME: &str = "Unknown";

/// Executes the completion transaction for supervisor approvals.
///
/// Within one transaction it re-verifies the request is still in
/// `pending_supervisor` (compare-and-set), moves it to `completed`,
/// reassigns the asset's holder and department, and appends exactly one
/// ledger entry. If any step fails the whole transaction rolls back and
/// the request remains in `pending_supervisor`, safe to retry. The
/// asset's holder/department are written nowhere else in the codebase.
#[derive(Debug, Clone)]
pub struct PgOwnershipTransactor {
    pool: PgPool,
}

impl PgOwnershipTransactor {
    /// Create a new transactor.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Complete a transfer. See the type-level docs for the contract.
    pub async fn complete(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<CompletedTransfer> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // CAS to completed; a concurrent approval already committed makes
        // this match zero rows and the transaction is abandoned.
        let request: Option<TransferRequest> = sqlx::query_as(
            "UPDATE transfer_requests \
             SET status = 'completed', supervisor_action = $2, supervisor_comments = $3, \
                 supervisor_action_by = $4, supervisor_action_at = $5, completed_at = $5 \
             WHERE id = $1 AND status = 'pending_supervisor' \
             RETURNING *",
        )
        .bind(request_id)
        .bind(decision.outcome)
        .bind(&decision.comments)
        .bind(decision.decided_by)
        .bind(decision.decided_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to complete transfer request", e)
        })?;

        let Some(request) = request else {
            // Dropping the transaction rolls it back.
            return Err(AppError::invalid_transition(
                "Request is no longer awaiting supervisor approval",
            ));
        };

        let asset: Asset = sqlx::query_as(
            "UPDATE assets \
             SET current_holder_id = $2, department_id = $3, updated_at = $4 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(request.asset_id)
        .bind(request.to_user_id)
        .bind(request.to_department_id)
        .bind(decision.decided_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reassign asset ownership", e)
        })?;

        // Names are captured inside the same transaction so the ledger
        // reflects the endpoints exactly as they exist at completion.
        let from_user_name = user_name(&mut tx, request.from_user_id).await?;
        let to_user_name = user_name(&mut tx, request.to_user_id).await?;
        let from_department_name = department_name(&mut tx, request.from_department_id).await?;
        let to_department_name = department_name(&mut tx, request.to_department_id).await?;

        let transfer_kind =
            TransferKind::classify(request.from_department_id, request.to_department_id);

        let history: TransferHistoryEntry = sqlx::query_as(
            "INSERT INTO transfer_history \
             (asset_id, transfer_request_id, from_user_id, to_user_id, \
              from_department_id, to_department_id, from_user_name, to_user_name, \
              from_department_name, to_department_name, transfer_kind, slip_number, \
              remarks, transferred_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING *",
        )
        .bind(request.asset_id)
        .bind(request.id)
        .bind(request.from_user_id)
        .bind(request.to_user_id)
        .bind(request.from_department_id)
        .bind(request.to_department_id)
        .bind(&from_user_name)
        .bind(&to_user_name)
        .bind(&from_department_name)
        .bind(&to_department_name)
        .bind(transfer_kind)
        .bind(&request.slip_number)
        .bind(&decision.comments)
        .bind(decision.decided_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append history entry", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to commit ownership transfer",
                e,
            )
        })?;

        Ok(CompletedTransfer {
            request,
            history,
            asset,
        })
    }
}

async fn user_name(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> AppResult<String> {
    let name: Option<String> = sqlx::query_scalar("SELECT emp_name FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve user name", e))?;
    Ok(name.unwrap_or_else(|| UNKNOWN_NAME.to_string()))
}

async fn department_name(
    tx: &mut Transaction<'_, Postgres>,
    id: Option<Uuid>,
) -> AppResult<String> {
    let Some(id) = id else {
        return Ok(UNKNOWN_NAME.to_string());
    };
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM departments WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve department name", e)
        })?;
    Ok(name.unwrap_or_else(|| UNKNOWN_NAME.to_string()))
}
