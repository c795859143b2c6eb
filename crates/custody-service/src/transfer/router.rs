//! Approval routing: resolves the two approvers gating a request.
//!
//! Routing happens at creation time only. The result is frozen into the
//! request; later changes to a user's HoD mapping never retroactively
//! affect open requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use custody_core::result::AppResult;

use crate::context::ActorContext;
use crate::ports::{IdentityPort, TransferStore};

/// The two identities resolved to gate a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routing {
    /// First-stage approver: the requester's configured HoD. May be
    /// absent, in which case only an admin override can pass the stage.
    pub hod_id: Option<Uuid>,
    /// Designated second-stage approver. Informational: any
    /// supervisor-capable actor may give the final approval.
    pub supervisor_id: Option<Uuid>,
}

/// Resolves approvers for new transfer requests.
pub struct ApprovalRouter {
    identity: Arc<dyn IdentityPort>,
    store: Arc<dyn TransferStore>,
}

impl ApprovalRouter {
    /// Create a new router.
    pub fn new(identity: Arc<dyn IdentityPort>, store: Arc<dyn TransferStore>) -> Self {
        Self { identity, store }
    }

    /// Resolve both approvers for a request opened by `requester`.
    ///
    /// Supervisor selection is pinned to a deterministic policy: the
    /// active supervisor with the fewest open requests designated to
    /// them, ties broken by earliest account creation, then by ID.
    pub async fn route(&self, requester: &ActorContext) -> AppResult<Routing> {
        let supervisors = self.identity.active_supervisors().await?;

        let mut best: Option<(u64, DateTime<Utc>, Uuid)> = None;
        for supervisor in supervisors {
            let open = self.store.count_active_for_supervisor(supervisor.id).await?;
            let key = (open, supervisor.created_at, supervisor.id);
            if best.is_none_or(|current| key < current) {
                best = Some(key);
            }
        }

        Ok(Routing {
            hod_id: requester.hod_id,
            supervisor_id: best.map(|(_, _, id)| id),
        })
    }
}
