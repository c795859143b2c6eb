//! CustodyTrack Server — Physical Asset Transfer Approval Service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use custody_core::config::AppConfig;
use custody_core::error::AppError;
use custody_database::repositories::asset::AssetRepository;
use custody_database::repositories::audit::AuditLogRepository;
use custody_database::repositories::notification::NotificationRepository;
use custody_database::repositories::transfer_history::TransferHistoryRepository;
use custody_database::repositories::transfer_request::TransferRequestRepository;
use custody_database::repositories::user::UserRepository;
use custody_database::{DatabasePool, PgOwnershipTransactor};
use custody_service::ports::{
    AssetRegistry, AuditPort, DisabledNotifications, IdentityPort, NotificationPort,
    OwnershipTransactor, SlipNumberPort, TransferStore,
};
use custody_service::postgres::PgTransferStore;
use custody_service::transfer::{SlipNumberGenerator, TransferWorkflowService};

#[tokio::main]
async fn main() {
    let env = std::env::var("CUSTODY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CustodyTrack v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    custody_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let asset_repo = Arc::new(AssetRepository::new(db_pool.clone()));
    let request_repo = TransferRequestRepository::new(db_pool.clone());
    let history_repo = TransferHistoryRepository::new(db_pool.clone());
    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
    let audit_repo = Arc::new(AuditLogRepository::new(db_pool.clone()));

    // ── Workflow wiring ──────────────────────────────────────────
    let identity: Arc<dyn IdentityPort> = user_repo.clone();
    let assets: Arc<dyn AssetRegistry> = asset_repo;
    let store: Arc<dyn TransferStore> = Arc::new(PgTransferStore::new(request_repo, history_repo));
    let transactor: Arc<dyn OwnershipTransactor> =
        Arc::new(PgOwnershipTransactor::new(db_pool.clone()));
    let slips: Arc<dyn SlipNumberPort> = Arc::new(SlipNumberGenerator::new(store.clone()));
    let notifications: Arc<dyn NotificationPort> = if config.notification.enabled {
        notification_repo
    } else {
        tracing::info!("Notifications disabled by configuration");
        Arc::new(DisabledNotifications)
    };
    let audit: Arc<dyn AuditPort> = audit_repo;

    let workflow = Arc::new(TransferWorkflowService::new(
        identity,
        assets,
        store,
        transactor,
        slips,
        notifications,
        audit,
    ));

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = custody_api::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        users: user_repo,
        workflow,
    };

    let app = custody_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("CustodyTrack server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("CustodyTrack server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
