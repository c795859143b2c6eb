//! Approval decision types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The outcome of a single approval stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "decision_outcome", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    /// The stage approver accepted the transfer.
    Approved,
    /// The stage approver declined the transfer (final, no resubmission).
    Rejected,
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A recorded decision for one approval stage.
///
/// The acting user is recorded explicitly because the supervisor stage
/// accepts any supervisor-capable actor, not only the one designated at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDecision {
    /// Approve or reject.
    pub outcome: DecisionOutcome,
    /// Free-text comment entered by the approver.
    pub comments: Option<String>,
    /// The user who made the decision.
    pub decided_by: Uuid,
    /// When the decision was made.
    pub decided_at: DateTime<Utc>,
}

impl StageDecision {
    /// Create a decision stamped with the current time.
    pub fn new(outcome: DecisionOutcome, comments: Option<String>, decided_by: Uuid) -> Self {
        Self {
            outcome,
            comments,
            decided_by,
            decided_at: Utc::now(),
        }
    }
}
