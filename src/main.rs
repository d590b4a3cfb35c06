//! Wallet Ledger Service - Main Application Entry Point
//!
//! REST API for a multi-wallet money-movement service: topup, transfer,
//! refund/reverse, wallet freeze/unfreeze, and balance reconciliation.
//! Every balance change flows through a double-entry ledger inside a
//! single locking database transaction.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx; row-level `FOR UPDATE` locks
//! - **Money**: signed 64-bit integers in the currency's minor unit
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router
//! 5. Start server on configured port

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use dompet::{config, db, handlers, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; reads RUST_LOG, defaults to "info".
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(
        &config.database_url,
        config.db_max_connections,
        config.db_min_connections,
    )
    .await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let server_port = config.server_port;
    let state = AppState::new(pool, config);

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        // Money movement
        .route(
            "/api/v1/transactions/topup",
            post(handlers::transactions::topup),
        )
        .route(
            "/api/v1/transactions/transfer",
            post(handlers::transactions::transfer),
        )
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
        .route(
            "/api/v1/transactions/{id}/ledger",
            get(handlers::transactions::get_transaction_ledger),
        )
        .route(
            "/api/v1/users/{user_id}/transactions",
            get(handlers::transactions::list_user_transactions),
        )
        // Wallet reads
        .route(
            "/api/v1/users/{user_id}/wallets",
            get(handlers::wallets::list_wallets),
        )
        .route(
            "/api/v1/users/{user_id}/wallets/{wallet_type}",
            get(handlers::wallets::get_balance),
        )
        .route(
            "/api/v1/wallets/{wallet_id}/history",
            get(handlers::wallets::get_history),
        )
        .route(
            "/api/v1/wallets/{wallet_id}/validate",
            get(handlers::wallets::validate_balance),
        )
        // Admin operations
        .route(
            "/api/v1/admin/wallets/freeze",
            post(handlers::admin::freeze_wallet),
        )
        .route(
            "/api/v1/admin/wallets/unfreeze",
            post(handlers::admin::unfreeze_wallet),
        )
        .route(
            "/api/v1/admin/refunds",
            post(handlers::admin::refund_transaction),
        )
        .route(
            "/api/v1/admin/refunds/reverse",
            post(handlers::admin::reverse_transaction),
        )
        .route(
            "/api/v1/admin/transactions/{id}/refunds",
            get(handlers::admin::get_refund_history),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
