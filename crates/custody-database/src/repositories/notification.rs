//! Notification repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use custody_core::error::{AppError, ErrorKind};
use custody_core::result::AppResult;
use custody_entity::notification::Notification;

/// Repository for persisting user notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new notification row.
    pub async fn insert(
        &self,
        user_id: Uuid,
        kind: &str,
        subject: &str,
        body: &str,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, kind, subject, body) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user_id)
        .bind(kind)
        .bind(subject)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert notification", e)
        })
    }
}
