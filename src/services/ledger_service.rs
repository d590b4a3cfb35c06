//! Wallet ledger engine: topup and transfer.
//!
//! Both operations follow the same shape: validate without locks, replay on
//! a known idempotency key, then perform the whole mutation inside a single
//! database transaction that (1) acquires wallet row locks in canonical
//! order, (2) inserts the transaction row, (3) appends ledger entries
//! carrying the locked balances, (4) writes the new balances, (5) commits.
//! Any error after `begin` rolls the whole unit back; no partial state is
//! ever observable.
//!
//! # Idempotency
//!
//! The idempotency key is the concurrency-safe replay primitive. Two
//! concurrent requests with the same key either both find the committed row
//! up front, or one commits and the other's INSERT trips the UNIQUE
//! constraint, rolls back, and re-reads the winner's row.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    crypto,
    db::DbPool,
    error::AppError,
    models::ledger::LedgerEntry,
    models::transaction::{
        TopupRequest, Transaction, TransactionDetail, TransactionResponse, TransactionStatus,
        TransactionType, TransferRequest,
    },
    models::wallet::WalletType,
    repository,
    services::wallet_service::format_idr,
};

/// Credit a user's main wallet from an external funding channel.
///
/// # Errors
///
/// - `InvalidAmount`: amount is zero or negative
/// - `WalletNotFound` / `WalletNotActive`: no usable main wallet
/// - `BalanceOverflow`: crediting would exceed `i64::MAX`
pub async fn topup(
    pool: &DbPool,
    currency: &str,
    req: TopupRequest,
) -> Result<TransactionResponse, AppError> {
    if req.amount <= 0 {
        return Err(AppError::InvalidAmount);
    }

    // Replay: a prior transaction under this key is returned verbatim,
    // with no side effects.
    if let Some(prior) =
        repository::transactions::find_by_idempotency_key(pool, &req.idempotency_key).await?
    {
        return Ok(to_response(&prior));
    }

    let wallet =
        repository::wallets::find_by_user_and_type(pool, req.user_id, WalletType::Main).await?;
    if !wallet.is_active() {
        return Err(AppError::WalletNotActive);
    }

    let mut tx = pool.begin().await?;

    // Re-read under the exclusive row lock; the status may have changed
    // since the unlocked pre-check.
    let wallet = repository::wallets::lock_for_update(&mut tx, wallet.id).await?;
    if !wallet.is_active() {
        tx.rollback().await?;
        return Err(AppError::WalletNotActive);
    }

    let now = Utc::now();
    let transaction = Transaction {
        id: Uuid::new_v4(),
        idempotency_key: req.idempotency_key.clone(),
        user_id: req.user_id,
        transaction_type: TransactionType::Topup,
        amount: req.amount,
        currency: currency.to_string(),
        status: TransactionStatus::Success,
        from_wallet_id: None,
        to_wallet_id: Some(wallet.id),
        refunds_transaction_id: None,
        reference_id: Some(format!("TOPUP-{}", short_ref(Uuid::new_v4()))),
        description: format!("Topup via {}", req.channel_code),
        metadata: Some(json!({
            "channel_code": req.channel_code,
            "topup_method": "simulation",
        })),
        created_at: now,
        updated_at: now,
        completed_at: Some(now),
    };

    match repository::transactions::insert(&mut tx, &transaction).await {
        Ok(()) => {}
        Err(AppError::DuplicateIdempotencyKey) => {
            // Lost the race to another request with the same key: drop our
            // locks and replay the committed row.
            tx.rollback().await?;
            return replay_or_conflict(pool, &req.idempotency_key).await;
        }
        Err(e) => return Err(e),
    }

    let entry = LedgerEntry::credit(
        transaction.id,
        wallet.id,
        req.amount,
        wallet.balance,
        transaction.description.as_str(),
    )?;
    let new_balance = entry.balance_after;

    repository::ledger_entries::insert_many(&mut tx, std::slice::from_ref(&entry)).await?;
    repository::wallets::update_balance(&mut tx, wallet.id, new_balance).await?;

    tx.commit().await?;

    tracing::info!(
        transaction_id = %transaction.id,
        wallet_id = %wallet.id,
        amount = req.amount,
        "topup committed"
    );

    Ok(to_response(&transaction))
}

/// Move money between two users' main wallets.
///
/// The hardest path in the system: concurrent transfers over the same pair
/// of wallets are serialized without deadlock by always locking the wallet
/// with the smaller id first, regardless of which side is source or
/// destination.
///
/// # Errors
///
/// - `InvalidAmount`, `SameWallet`: request-level validation
/// - `UserNotFound`, `InvalidPin`: sender identity checks (before any lock)
/// - `WalletNotActive`, `InsufficientBalance`: checked again under the locks
pub async fn transfer(
    pool: &DbPool,
    currency: &str,
    req: TransferRequest,
) -> Result<TransactionResponse, AppError> {
    if req.amount <= 0 {
        return Err(AppError::InvalidAmount);
    }
    if req.user_id == req.to_user_id {
        return Err(AppError::SameWallet);
    }

    // PIN check happens entirely before any lock. A user without a PIN set
    // fails identically to a wrong PIN.
    let user = repository::users::find_by_id(pool, req.user_id).await?;
    let pin_hash = user.pin_hash.as_deref().ok_or(AppError::InvalidPin)?;
    if !crypto::verify_pin(&req.pin, pin_hash) {
        return Err(AppError::InvalidPin);
    }

    if let Some(prior) =
        repository::transactions::find_by_idempotency_key(pool, &req.idempotency_key).await?
    {
        return Ok(to_response(&prior));
    }

    let from_wallet =
        repository::wallets::find_by_user_and_type(pool, req.user_id, WalletType::Main).await?;
    let to_wallet =
        repository::wallets::find_by_user_and_type(pool, req.to_user_id, WalletType::Main).await?;

    if from_wallet.id == to_wallet.id {
        return Err(AppError::SameWallet);
    }

    // Fail fast without locks; both statuses are re-checked once locked.
    if !from_wallet.is_active() || !to_wallet.is_active() {
        return Err(AppError::WalletNotActive);
    }

    let mut tx = pool.begin().await?;

    // Canonical lock ordering: smaller wallet id first. Every path that
    // locks two wallets must use this order or deadlock comes back.
    let (from_wallet, to_wallet) = if from_wallet.id < to_wallet.id {
        let from = repository::wallets::lock_for_update(&mut tx, from_wallet.id).await?;
        let to = repository::wallets::lock_for_update(&mut tx, to_wallet.id).await?;
        (from, to)
    } else {
        let to = repository::wallets::lock_for_update(&mut tx, to_wallet.id).await?;
        let from = repository::wallets::lock_for_update(&mut tx, from_wallet.id).await?;
        (from, to)
    };

    if !from_wallet.is_active() || !to_wallet.is_active() {
        tx.rollback().await?;
        return Err(AppError::WalletNotActive);
    }
    if !from_wallet.has_sufficient_balance(req.amount) {
        tx.rollback().await?;
        return Err(AppError::InsufficientBalance);
    }

    let now = Utc::now();
    let description = req
        .description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "Transfer to user".to_string());

    let transaction = Transaction {
        id: Uuid::new_v4(),
        idempotency_key: req.idempotency_key.clone(),
        user_id: req.user_id,
        transaction_type: TransactionType::Transfer,
        amount: req.amount,
        currency: currency.to_string(),
        status: TransactionStatus::Success,
        from_wallet_id: Some(from_wallet.id),
        to_wallet_id: Some(to_wallet.id),
        refunds_transaction_id: None,
        reference_id: Some(format!("TRF-{}", short_ref(Uuid::new_v4()))),
        description: description.clone(),
        metadata: Some(json!({
            "from_user_id": req.user_id,
            "to_user_id": req.to_user_id,
        })),
        created_at: now,
        updated_at: now,
        completed_at: Some(now),
    };

    match repository::transactions::insert(&mut tx, &transaction).await {
        Ok(()) => {}
        Err(AppError::DuplicateIdempotencyKey) => {
            tx.rollback().await?;
            return replay_or_conflict(pool, &req.idempotency_key).await;
        }
        Err(e) => return Err(e),
    }

    // Double-entry pairing: one debit on the source, one credit on the
    // destination, equal amounts, balance_before taken from the locked rows.
    let debit_entry = LedgerEntry::debit(
        transaction.id,
        from_wallet.id,
        req.amount,
        from_wallet.balance,
        format!("Transfer out: {description}"),
    );
    let credit_entry = LedgerEntry::credit(
        transaction.id,
        to_wallet.id,
        req.amount,
        to_wallet.balance,
        format!("Transfer in: {description}"),
    )?;

    let new_from_balance = debit_entry.balance_after;
    let new_to_balance = credit_entry.balance_after;

    repository::ledger_entries::insert_many(&mut tx, &[debit_entry, credit_entry]).await?;
    repository::wallets::update_balance(&mut tx, from_wallet.id, new_from_balance).await?;
    repository::wallets::update_balance(&mut tx, to_wallet.id, new_to_balance).await?;

    tx.commit().await?;

    tracing::info!(
        transaction_id = %transaction.id,
        from_wallet_id = %from_wallet.id,
        to_wallet_id = %to_wallet.id,
        amount = req.amount,
        "transfer committed"
    );

    Ok(to_response(&transaction))
}

/// Transaction detail by id.
pub async fn get_transaction(pool: &DbPool, id: Uuid) -> Result<TransactionDetail, AppError> {
    let transaction = repository::transactions::find_by_id(pool, id).await?;
    Ok(to_detail(&transaction))
}

/// A user's transaction history, newest first.
pub async fn get_user_transactions(
    pool: &DbPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<TransactionDetail>, AppError> {
    let transactions = repository::transactions::list_by_user(pool, user_id, limit, offset).await?;
    Ok(transactions.iter().map(to_detail).collect())
}

/// After an idempotency-key clash, the committed row must exist; return it
/// as the replay result. A miss means the competing transaction has not
/// committed (or failed), which surfaces as the conflict error.
async fn replay_or_conflict(
    pool: &DbPool,
    idempotency_key: &str,
) -> Result<TransactionResponse, AppError> {
    match repository::transactions::find_by_idempotency_key(pool, idempotency_key).await? {
        Some(prior) => Ok(to_response(&prior)),
        None => Err(AppError::DuplicateIdempotencyKey),
    }
}

fn to_response(transaction: &Transaction) -> TransactionResponse {
    TransactionResponse {
        transaction_id: transaction.id,
        transaction_type: transaction.transaction_type,
        amount: transaction.amount,
        amount_idr: format_idr(transaction.amount),
        status: transaction.status,
        description: transaction.description.clone(),
        created_at: transaction.created_at,
    }
}

fn to_detail(transaction: &Transaction) -> TransactionDetail {
    TransactionDetail {
        id: transaction.id,
        transaction_type: transaction.transaction_type,
        amount: transaction.amount,
        amount_idr: format_idr(transaction.amount),
        status: transaction.status,
        from_wallet_id: transaction.from_wallet_id,
        to_wallet_id: transaction.to_wallet_id,
        reference_id: transaction.reference_id.clone(),
        description: transaction.description.clone(),
        created_at: transaction.created_at,
        completed_at: transaction.completed_at,
    }
}

/// First 8 hex characters of a UUID, for human-facing references.
fn short_ref(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}
