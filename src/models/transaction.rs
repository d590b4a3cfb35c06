//! Transaction model and money-movement API types.
//!
//! A transaction row records the intent of a movement; its ledger entries
//! record the effect. Completed transactions are immutable except for the
//! status transitions `pending -> success|failed` and `success -> reversed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a transaction record from the database.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transaction {
    pub id: Uuid,

    /// Client-supplied key identifying a single intent to mutate.
    /// Globally unique across all transactions, refunds included; a replay
    /// under the same key returns this row verbatim.
    pub idempotency_key: String,

    /// User whose action created the transaction.
    pub user_id: Uuid,

    pub transaction_type: TransactionType,

    /// Amount in minor units; always strictly positive.
    pub amount: i64,

    pub currency: String,
    pub status: TransactionStatus,

    /// Source wallet (debited). `None` for topups and refunds.
    pub from_wallet_id: Option<Uuid>,

    /// Destination wallet (credited). `None` for withdrawals.
    pub to_wallet_id: Option<Uuid>,

    /// Forward link from a refund to the transaction it refunds.
    pub refunds_transaction_id: Option<Uuid>,

    /// Human reference, e.g. "TRF-1a2b3c4d".
    pub reference_id: Option<String>,

    pub description: String,

    /// Opaque JSON blob; refunds store the reason and acting admin here.
    pub metadata: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Topup,
    Transfer,
    Payment,
    Withdrawal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Reversed,
}

// === API request/response models ===

/// Request to top up the caller's main wallet.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": "550e8400-e29b-41d4-a716-446655440000",
///   "amount": 5000000,
///   "channel_code": "BANK_A",
///   "idempotency_key": "topup-2026-001"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TopupRequest {
    pub user_id: Uuid,

    /// Amount in minor units, > 0.
    pub amount: i64,

    /// Funding channel, recorded in transaction metadata.
    pub channel_code: String,

    pub idempotency_key: String,
}

/// Request to transfer between two users' main wallets.
///
/// The PIN is verified against the sender's stored bcrypt hash before any
/// lock is taken and is never persisted or logged.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub user_id: Uuid,
    pub to_user_id: Uuid,

    /// Amount in minor units, > 0.
    pub amount: i64,

    /// 6-digit transfer PIN.
    pub pin: String,

    pub description: Option<String>,
    pub idempotency_key: String,
}

/// Request to refund a prior transaction, fully or partially.
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub admin_id: Uuid,
    pub original_transaction_id: Uuid,

    /// Free-text justification, at least 10 characters.
    pub reason: String,

    /// Partial refund amount in minor units; `None` refunds in full.
    pub amount: Option<i64>,

    pub idempotency_key: String,
}

/// Request to reverse (fully refund) a prior transaction.
#[derive(Debug, Deserialize)]
pub struct ReverseRequest {
    pub admin_id: Uuid,
    pub original_transaction_id: Uuid,
    pub reason: String,
    pub idempotency_key: String,
}

/// Response returned by topup and transfer.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub amount_idr: String,
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Full transaction view for lookups and history listings.
#[derive(Debug, Serialize)]
pub struct TransactionDetail {
    pub id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub amount_idr: String,
    pub status: TransactionStatus,
    pub from_wallet_id: Option<Uuid>,
    pub to_wallet_id: Option<Uuid>,
    pub reference_id: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response returned by refund and reverse.
#[derive(Debug, Serialize)]
pub struct RefundResponse {
    pub refund_transaction_id: Uuid,
    pub original_transaction_id: Uuid,
    pub amount: i64,
    pub status: TransactionStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// One refund linked to an original transaction.
#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct RefundHistoryItem {
    pub refund_transaction_id: Uuid,
    pub amount: i64,
    pub reason: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}
