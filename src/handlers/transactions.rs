//! Money-movement HTTP handlers.
//!
//! - POST /api/v1/transactions/topup    - credit the caller's main wallet
//! - POST /api/v1/transactions/transfer - move money between two users
//! - GET  /api/v1/transactions/{id}          - transaction detail
//! - GET  /api/v1/transactions/{id}/ledger   - its ledger entries
//! - GET  /api/v1/users/{user_id}/transactions - per-user history

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::Pagination,
    models::ledger::LedgerEntry,
    models::transaction::{
        TopupRequest, TransactionDetail, TransactionResponse, TransferRequest,
    },
    services::{ledger_service, wallet_service},
    state::AppState,
};

/// Top up the caller's main wallet.
///
/// Replaying the same idempotency key returns the original transaction
/// with a 200, byte-identical to the first response.
pub async fn topup(
    State(state): State<AppState>,
    Json(request): Json<TopupRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction =
        ledger_service::topup(&state.pool, &state.config.currency, request).await?;
    Ok(Json(transaction))
}

/// Transfer between two users' main wallets.
pub async fn transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction =
        ledger_service::transfer(&state.pool, &state.config.currency, request).await?;
    Ok(Json(transaction))
}

/// Transaction detail by id.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionDetail>, AppError> {
    let detail = ledger_service::get_transaction(&state.pool, transaction_id).await?;
    Ok(Json(detail))
}

/// Ledger entries written by a transaction.
pub async fn get_transaction_ledger(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    let entries = wallet_service::get_transaction_entries(&state.pool, transaction_id).await?;
    Ok(Json(entries))
}

/// A user's transaction history, newest first.
pub async fn list_user_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<TransactionDetail>>, AppError> {
    let (limit, offset) = pagination.clamped();
    let transactions =
        ledger_service::get_user_transactions(&state.pool, user_id, limit, offset).await?;
    Ok(Json(transactions))
}
