//! Query functions for the `wallets` table.
//!
//! `lock_for_update` is the pessimistic locking primitive the engines build
//! on: the returned row is exclusively held until the enclosing transaction
//! commits or rolls back, and the `balance` it carries is the value every
//! ledger entry in that transaction must use as `balance_before`.

use uuid::Uuid;

use crate::{
    db::{DbPool, DbTx},
    error::AppError,
    models::wallet::{Wallet, WalletStatus, WalletType},
};

pub async fn create(pool: &DbPool, wallet: &Wallet) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO wallets (id, user_id, wallet_type, balance, currency, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(wallet.id)
    .bind(wallet.user_id)
    .bind(wallet.wallet_type)
    .bind(wallet.balance)
    .bind(&wallet.currency)
    .bind(wallet.status)
    .bind(wallet.created_at)
    .bind(wallet.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Wallet, AppError> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::WalletNotFound)
}

/// Snapshot read inside an open transaction (no lock taken).
pub async fn find_by_id_in_tx(tx: &mut DbTx<'_>, id: Uuid) -> Result<Wallet, AppError> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::WalletNotFound)
}

pub async fn find_by_user_and_type(
    pool: &DbPool,
    user_id: Uuid,
    wallet_type: WalletType,
) -> Result<Wallet, AppError> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE user_id = $1 AND wallet_type = $2")
        .bind(user_id)
        .bind(wallet_type)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::WalletNotFound)
}

pub async fn list_by_user(pool: &DbPool, user_id: Uuid) -> Result<Vec<Wallet>, AppError> {
    let wallets = sqlx::query_as::<_, Wallet>(
        "SELECT * FROM wallets WHERE user_id = $1 ORDER BY created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(wallets)
}

/// Fetch a wallet row and hold an exclusive lock on it until commit.
///
/// Blocks until the row lock is granted. Every path in the system that
/// locks two wallets must acquire them in ascending id order; this
/// function is the only place wallet locks are taken.
pub async fn lock_for_update(tx: &mut DbTx<'_>, id: Uuid) -> Result<Wallet, AppError> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::WalletNotFound)
}

/// Write a wallet's new balance. Must only be called on a row previously
/// locked in the same transaction.
pub async fn update_balance(
    tx: &mut DbTx<'_>,
    id: Uuid,
    new_balance: i64,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE wallets SET balance = $1, updated_at = NOW() WHERE id = $2")
        .bind(new_balance)
        .bind(id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::WalletNotFound);
    }

    Ok(())
}

pub async fn update_status(
    tx: &mut DbTx<'_>,
    id: Uuid,
    status: WalletStatus,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE wallets SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::WalletNotFound);
    }

    Ok(())
}
