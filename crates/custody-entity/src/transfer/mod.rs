//! Transfer workflow domain entities.

pub mod decision;
pub mod history;
pub mod request;
pub mod status;

pub use decision::{DecisionOutcome, StageDecision};
pub use history::{CompletedTransfer, TransferHistoryEntry, TransferKind};
pub use request::{CreateTransfer, NewTransferRequest, TransferRequest};
pub use status::TransferStatus;
