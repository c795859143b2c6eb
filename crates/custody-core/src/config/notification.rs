//! Notification delivery configuration.

use serde::{Deserialize, Serialize};

/// Notification side-channel configuration.
///
/// Notifications are best-effort; disabling them never affects workflow
/// correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether notifications are persisted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
