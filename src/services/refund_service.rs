//! Refund engine: full reversal and partial refund.
//!
//! A refund is a NEW transaction with NEW ledger entries. The original's
//! ledger entries are never touched; the link lives in the refund row's
//! `refunds_transaction_id` column (and mirrored in its metadata). The
//! ledger stays a monotonically growing append-only sequence.
//!
//! Concurrent refunds of the same original are serialized by a
//! `SELECT ... FOR UPDATE` on the original transaction row, which makes
//! the cumulative-ceiling check (Σ refunds <= original amount) race-free.
//! When the cumulative total reaches the original amount, the original's
//! status moves `success -> reversed` inside the same database
//! transaction, under that same row lock.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::audit::{AuditAction, AuditLog},
    models::ledger::LedgerEntry,
    models::transaction::{
        RefundHistoryItem, RefundRequest, RefundResponse, ReverseRequest, Transaction,
        TransactionStatus, TransactionType,
    },
    repository,
};

/// Refund a prior transaction, fully or partially.
///
/// Destination:
/// - transfers are refunded to the **sender** (the party made whole);
/// - topups are reversed to their destination wallet;
/// - anything else is unrefundable.
pub async fn refund(pool: &DbPool, req: RefundRequest) -> Result<RefundResponse, AppError> {
    execute_refund(pool, req, AuditAction::RefundTransaction).await
}

/// Reverse a transaction: a refund of the full original amount.
pub async fn reverse(pool: &DbPool, req: ReverseRequest) -> Result<RefundResponse, AppError> {
    let refund_req = RefundRequest {
        admin_id: req.admin_id,
        original_transaction_id: req.original_transaction_id,
        reason: req.reason,
        amount: None,
        idempotency_key: req.idempotency_key,
    };

    execute_refund(pool, refund_req, AuditAction::ReverseTransaction).await
}

/// All refunds recorded against an original transaction, newest first.
pub async fn get_refund_history(
    pool: &DbPool,
    original_transaction_id: Uuid,
) -> Result<Vec<RefundHistoryItem>, AppError> {
    repository::transactions::list_refunds_of(pool, original_transaction_id).await
}

async fn execute_refund(
    pool: &DbPool,
    req: RefundRequest,
    action: AuditAction,
) -> Result<RefundResponse, AppError> {
    if req.reason.trim().len() < 10 {
        return Err(AppError::InvalidRequest(
            "Refund reason must be at least 10 characters".to_string(),
        ));
    }
    if matches!(req.amount, Some(a) if a <= 0) {
        return Err(AppError::InvalidAmount);
    }

    if let Some(prior) =
        repository::transactions::find_by_idempotency_key(pool, &req.idempotency_key).await?
    {
        return replay_refund(prior);
    }

    let original =
        repository::transactions::find_by_id(pool, req.original_transaction_id).await?;
    if original.status != TransactionStatus::Success {
        return Err(AppError::OriginalNotSuccess);
    }

    let refund_amount = match req.amount {
        Some(amount) if amount > original.amount => return Err(AppError::RefundExceedsOriginal),
        Some(amount) => amount,
        None => original.amount,
    };

    // Refund destination per the original's kind.
    let target_wallet_id = if original.transaction_type == TransactionType::Transfer {
        original
            .from_wallet_id
            .ok_or(AppError::UnrefundableOriginal)?
    } else if let Some(to_wallet_id) = original.to_wallet_id {
        to_wallet_id
    } else {
        return Err(AppError::UnrefundableOriginal);
    };

    let mut tx = pool.begin().await?;

    // Lock the original's row. This serializes every refund of the same
    // original and covers the success -> reversed transition below.
    let original = repository::transactions::lock_for_update(&mut tx, original.id).await?;
    if original.status != TransactionStatus::Success {
        tx.rollback().await?;
        return Err(AppError::OriginalNotSuccess);
    }

    // Cumulative ceiling: the sum of all successful refunds linked to the
    // original must never exceed the original amount.
    let already_refunded = repository::transactions::sum_refunds_of(&mut tx, original.id).await?;
    if already_refunded + refund_amount > original.amount {
        tx.rollback().await?;
        return Err(AppError::RefundExceedsOriginal);
    }

    let wallet = repository::wallets::lock_for_update(&mut tx, target_wallet_id).await?;
    if !wallet.is_active() {
        tx.rollback().await?;
        return Err(AppError::WalletNotActive);
    }

    let now = Utc::now();
    let reason = req.reason.trim().to_string();
    let original_id_text = original.id.to_string();
    let original_short = &original_id_text[..8];

    let refund_tx = Transaction {
        id: Uuid::new_v4(),
        idempotency_key: req.idempotency_key.clone(),
        user_id: original.user_id,
        // Refunds are recorded as topup-kind; the linkage column and
        // metadata mark their origin.
        transaction_type: TransactionType::Topup,
        amount: refund_amount,
        currency: original.currency.clone(),
        status: TransactionStatus::Success,
        from_wallet_id: None,
        to_wallet_id: Some(target_wallet_id),
        refunds_transaction_id: Some(original.id),
        reference_id: Some(format!("REFUND-{original_short}")),
        description: format!("Refund for transaction {original_short}: {reason}"),
        metadata: Some(json!({
            "original_transaction_id": original.id,
            "refund_type": "admin_refund",
            "reason": reason,
            "admin_id": req.admin_id,
            "is_partial": req.amount.is_some(),
        })),
        created_at: now,
        updated_at: now,
        completed_at: Some(now),
    };

    match repository::transactions::insert(&mut tx, &refund_tx).await {
        Ok(()) => {}
        Err(AppError::DuplicateIdempotencyKey) => {
            tx.rollback().await?;
            return match repository::transactions::find_by_idempotency_key(
                pool,
                &req.idempotency_key,
            )
            .await?
            {
                Some(prior) => replay_refund(prior),
                None => Err(AppError::DuplicateIdempotencyKey),
            };
        }
        Err(e) => return Err(e),
    }

    let entry = LedgerEntry::credit(
        refund_tx.id,
        wallet.id,
        refund_amount,
        wallet.balance,
        refund_tx.description.as_str(),
    )?;
    let new_balance = entry.balance_after;

    repository::ledger_entries::insert_many(&mut tx, std::slice::from_ref(&entry)).await?;
    repository::wallets::update_balance(&mut tx, wallet.id, new_balance).await?;

    // Fully refunded: the original transitions to reversed, still under
    // its row lock. Its ledger entries are left exactly as written.
    if already_refunded + refund_amount == original.amount {
        repository::transactions::update_status(&mut tx, original.id, TransactionStatus::Reversed)
            .await?;
    }

    let audit = AuditLog::new(
        Some(req.admin_id),
        action,
        "transaction",
        Some(original.id),
        format!(
            "Refund transaction {original_short} for amount {refund_amount}. Reason: {reason}"
        ),
    );
    repository::audit_logs::insert(&mut tx, &audit).await?;

    tx.commit().await?;

    tracing::info!(
        refund_transaction_id = %refund_tx.id,
        original_transaction_id = %original.id,
        wallet_id = %wallet.id,
        amount = refund_amount,
        "refund committed"
    );

    Ok(RefundResponse {
        refund_transaction_id: refund_tx.id,
        original_transaction_id: original.id,
        amount: refund_amount,
        status: refund_tx.status,
        reason,
        created_at: refund_tx.created_at,
    })
}

/// Turn a previously committed refund row into the replay response.
///
/// A prior row without a refund link means the key was first used by a
/// non-refund transaction; that is a conflict, not a replay.
fn replay_refund(prior: Transaction) -> Result<RefundResponse, AppError> {
    let original_transaction_id = prior
        .refunds_transaction_id
        .ok_or(AppError::DuplicateIdempotencyKey)?;

    let reason = prior
        .metadata
        .as_ref()
        .and_then(|m| m.get("reason"))
        .and_then(|r| r.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(RefundResponse {
        refund_transaction_id: prior.id,
        original_transaction_id,
        amount: prior.amount,
        status: prior.status,
        reason,
        created_at: prior.created_at,
    })
}
