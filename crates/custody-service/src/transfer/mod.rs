//! The transfer approval workflow.

pub mod router;
pub mod slip;
pub mod workflow;

pub use router::{ApprovalRouter, Routing};
pub use slip::SlipNumberGenerator;
pub use workflow::TransferWorkflowService;
