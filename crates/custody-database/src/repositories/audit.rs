//! Audit log repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use custody_core::error::{AppError, ErrorKind};
use custody_core::result::AppResult;
use custody_entity::audit::AuditLogEntry;

/// Repository for the append-only audit log.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit entry.
    pub async fn insert(
        &self,
        actor_id: Uuid,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        description: &str,
    ) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (actor_id, action, entity_type, entity_id, description) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(actor_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert audit entry", e)
        })
    }
}
