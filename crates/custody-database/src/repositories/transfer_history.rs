//! Transfer history ledger repository.
//!
//! Read-only by design: ledger rows are inserted exclusively by the
//! ownership transactor, inside the completion transaction, and are
//! never updated or deleted.

use sqlx::PgPool;
use uuid::Uuid;

use custody_core::error::{AppError, ErrorKind};
use custody_core::result::AppResult;
use custody_core::types::pagination::{PageRequest, PageResponse};
use custody_entity::transfer::TransferHistoryEntry;

/// Repository for reading the custody ledger.
#[derive(Debug, Clone)]
pub struct TransferHistoryRepository {
    pool: PgPool,
}

impl TransferHistoryRepository {
    /// Create a new history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ledger entries for an asset, newest first.
    pub async fn find_by_asset(
        &self,
        asset_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferHistoryEntry>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transfer_history WHERE asset_id = $1")
                .bind(asset_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count history", e)
                })?;

        let items = sqlx::query_as::<_, TransferHistoryEntry>(
            "SELECT * FROM transfer_history WHERE asset_id = $1 \
             ORDER BY transferred_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(asset_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list transfer history", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
