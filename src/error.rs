//! Error types and HTTP error response handling.
//!
//! This module defines the application-wide error taxonomy and how each kind
//! is converted into an HTTP response with a stable machine-readable code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Input**: the request itself is malformed or violates a business rule
///   that needs no database state to detect
/// - **State**: a referenced entity is missing or in the wrong state; raised
///   after lock acquisition and always causes a rollback
/// - **Conflict**: concurrent or duplicate intent detected
/// - **Integrity**: arithmetic or accounting violations; fatal for the
///   operation and logged with full context
/// - **Transient**: database unavailable; safe for callers to retry, never
///   retried internally
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (connection, query, or pool error).
    ///
    /// Wraps any `sqlx::Error` via `#[from]`. Pool exhaustion and I/O
    /// failures map to 503; everything else is an opaque 500.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Amount is zero or negative. Amounts are strictly positive integers
    /// in the currency's minor unit.
    #[error("Amount must be a positive integer in minor units")]
    InvalidAmount,

    /// PIN is missing, not set, or does not match the stored hash.
    ///
    /// The same variant covers every PIN failure so the response shape
    /// reveals nothing about which check failed.
    #[error("Invalid PIN")]
    InvalidPin,

    /// Source and destination resolve to the same wallet.
    #[error("Cannot transfer to the same wallet")]
    SameWallet,

    /// Request body or parameters are invalid. The string carries details.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// The original transaction has no wallet a refund could be credited to.
    #[error("Cannot determine target wallet for refund")]
    UnrefundableOriginal,

    /// Requested refund (alone or cumulatively with prior refunds) exceeds
    /// the original transaction amount.
    #[error("Refund amount cannot exceed original amount")]
    RefundExceedsOriginal,

    /// Wallet exists but is frozen or closed.
    #[error("Wallet is not active")]
    WalletNotActive,

    #[error("Wallet not found")]
    WalletNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Transaction not found")]
    TransactionNotFound,

    /// Only transactions in `success` status can be refunded or reversed.
    #[error("Can only refund successful transactions")]
    OriginalNotSuccess,

    /// The idempotency key clashed with an existing row that is not a
    /// replayable prior result. Distinct from replay, which is not an error.
    #[error("Duplicate idempotency key")]
    DuplicateIdempotencyKey,

    /// An admin attempted an action on their own account.
    #[error("Self action is forbidden")]
    SelfActionForbidden,

    /// Raised by collaborators outside the core; propagated unchanged.
    #[error("Unauthorized")]
    Unauthorized,

    /// Raised by collaborators outside the core; propagated unchanged.
    #[error("Forbidden")]
    Forbidden,

    /// Crediting the wallet would overflow a signed 64-bit balance.
    #[error("Balance overflow")]
    BalanceOverflow,

    #[error("Insufficient balance")]
    InsufficientBalance,
}

/// Convert `AppError` into an HTTP response.
///
/// Every error renders as
///
/// ```json
/// {
///   "error": {
///     "code": "stable_error_code",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidAmount => (StatusCode::BAD_REQUEST, "invalid_amount", self.to_string()),
            AppError::InvalidPin => (StatusCode::BAD_REQUEST, "invalid_pin", self.to_string()),
            AppError::SameWallet => (StatusCode::BAD_REQUEST, "same_wallet", self.to_string()),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::UnrefundableOriginal => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unrefundable_original",
                self.to_string(),
            ),
            AppError::RefundExceedsOriginal => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "refund_exceeds_original",
                self.to_string(),
            ),
            AppError::WalletNotActive => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "wallet_not_active",
                self.to_string(),
            ),
            AppError::WalletNotFound => {
                (StatusCode::NOT_FOUND, "wallet_not_found", self.to_string())
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", self.to_string()),
            AppError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                self.to_string(),
            ),
            AppError::OriginalNotSuccess => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "original_not_success",
                self.to_string(),
            ),
            AppError::DuplicateIdempotencyKey => (
                StatusCode::CONFLICT,
                "duplicate_idempotency_key",
                self.to_string(),
            ),
            AppError::SelfActionForbidden => (
                StatusCode::CONFLICT,
                "self_action_forbidden",
                self.to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::InsufficientBalance => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_balance",
                self.to_string(),
            ),
            AppError::BalanceOverflow => {
                // Integrity failure: the operation rolled back, but the
                // attempt itself deserves an error-level trace.
                tracing::error!("balance overflow rejected");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "balance_overflow",
                    self.to_string(),
                )
            }
            AppError::Database(ref e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "database_unavailable",
                    "Database is temporarily unavailable".to_string(),
                ),
                _ => {
                    tracing::error!(error = %e, "database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "An internal error occurred".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
