//! Administrative HTTP handlers.
//!
//! - POST /api/v1/admin/wallets/freeze
//! - POST /api/v1/admin/wallets/unfreeze
//! - POST /api/v1/admin/refunds
//! - POST /api/v1/admin/refunds/reverse
//! - GET  /api/v1/admin/transactions/{id}/refunds
//!
//! Role checks on these endpoints belong to the gateway; the acting
//! admin id is taken from the request body and recorded in the audit
//! trail.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::transaction::{RefundHistoryItem, RefundRequest, RefundResponse, ReverseRequest},
    models::wallet::WalletStatusRequest,
    services::{refund_service, wallet_admin_service},
    state::AppState,
};

/// Freeze a wallet.
pub async fn freeze_wallet(
    State(state): State<AppState>,
    Json(request): Json<WalletStatusRequest>,
) -> Result<StatusCode, AppError> {
    wallet_admin_service::freeze(
        &state.pool,
        request.admin_id,
        request.wallet_id,
        &request.reason,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unfreeze a wallet.
pub async fn unfreeze_wallet(
    State(state): State<AppState>,
    Json(request): Json<WalletStatusRequest>,
) -> Result<StatusCode, AppError> {
    wallet_admin_service::unfreeze(
        &state.pool,
        request.admin_id,
        request.wallet_id,
        &request.reason,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Refund a transaction, fully or partially.
pub async fn refund_transaction(
    State(state): State<AppState>,
    Json(request): Json<RefundRequest>,
) -> Result<Json<RefundResponse>, AppError> {
    let response = refund_service::refund(&state.pool, request).await?;
    Ok(Json(response))
}

/// Reverse a transaction (full refund).
pub async fn reverse_transaction(
    State(state): State<AppState>,
    Json(request): Json<ReverseRequest>,
) -> Result<Json<RefundResponse>, AppError> {
    let response = refund_service::reverse(&state.pool, request).await?;
    Ok(Json(response))
}

/// Refund history of an original transaction.
pub async fn get_refund_history(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Vec<RefundHistoryItem>>, AppError> {
    let history = refund_service::get_refund_history(&state.pool, transaction_id).await?;
    Ok(Json(history))
}
