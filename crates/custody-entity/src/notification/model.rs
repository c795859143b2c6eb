//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted notification for a user.
///
/// Delivery (email etc.) happens outside this system; rows here are the
/// durable record the UI reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Workflow event kind (snake_case string form of `NotificationKind`).
    pub kind: String,
    /// Notification subject line.
    pub subject: String,
    /// Notification body text.
    pub body: String,
    /// When the user read this notification.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}
