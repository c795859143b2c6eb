//! Asset repository implementation.
//!
//! Read-only: the asset's holder and department fields are written
//! exclusively by the ownership transactor.

use sqlx::PgPool;
use uuid::Uuid;

use custody_core::error::{AppError, ErrorKind};
use custody_core::result::AppResult;
use custody_entity::asset::Asset;

/// Repository for asset lookups.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Create a new asset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an asset by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find asset by id", e)
            })
    }
}
