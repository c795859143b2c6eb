//! Capabilities granted to users through their role.
//!
//! Authorization checks in the workflow operate on capabilities, not on
//! role names, so the checks stay decoupled from any role-naming scheme.

use serde::{Deserialize, Serialize};

/// A discrete permission relevant to the transfer workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May open a transfer request.
    RequestTransfer,
    /// May give the final (second-stage) approval on any request.
    ApproveAsSupervisor,
    /// May override any approval stage and see every request.
    AdministerTransfers,
}
