//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use custody_core::config::AppConfig;
use custody_database::repositories::user::UserRepository;
use custody_service::transfer::TransferWorkflowService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// User lookups for actor resolution.
    pub users: Arc<UserRepository>,
    /// The transfer approval workflow.
    pub workflow: Arc<TransferWorkflowService>,
}
