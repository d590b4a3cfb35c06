//! Wallet read HTTP handlers.
//!
//! - GET /api/v1/users/{user_id}/wallets                - all wallets
//! - GET /api/v1/users/{user_id}/wallets/{wallet_type}  - one balance
//! - GET /api/v1/wallets/{wallet_id}/history            - ledger history
//! - GET /api/v1/wallets/{wallet_id}/validate           - reconciliation

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::Pagination,
    models::wallet::{BalanceValidation, WalletBalance, WalletHistory, WalletType},
    services::{reconciliation_service, wallet_service},
    state::AppState,
};

/// All wallets of a user.
pub async fn list_wallets(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<WalletBalance>>, AppError> {
    let wallets = wallet_service::get_all_wallets(&state.pool, user_id).await?;
    Ok(Json(wallets))
}

/// Balance of one wallet selected by type.
pub async fn get_balance(
    State(state): State<AppState>,
    Path((user_id, wallet_type)): Path<(Uuid, WalletType)>,
) -> Result<Json<WalletBalance>, AppError> {
    let balance = wallet_service::get_balance(&state.pool, user_id, wallet_type).await?;
    Ok(Json(balance))
}

/// Paginated ledger history of a wallet.
pub async fn get_history(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<WalletHistory>, AppError> {
    let (limit, offset) = pagination.clamped();
    let history = wallet_service::get_history(&state.pool, wallet_id, limit, offset).await?;
    Ok(Json(history))
}

/// Reconcile the wallet's stored balance against its ledger.
pub async fn validate_balance(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<BalanceValidation>, AppError> {
    let validation = reconciliation_service::validate_balance(&state.pool, wallet_id).await?;
    Ok(Json(validation))
}
