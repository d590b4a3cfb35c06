//! Query functions for the `ledger_entries` table.
//!
//! Only INSERT and SELECT exist here. The ledger is append-only; adding an
//! UPDATE or DELETE to this module would be a correctness bug, not a
//! feature.

use uuid::Uuid;

use crate::{
    db::{DbPool, DbTx},
    error::AppError,
    models::ledger::LedgerEntry,
};

/// Append one or more entries within the caller's transaction.
pub async fn insert_many(tx: &mut DbTx<'_>, entries: &[LedgerEntry]) -> Result<(), AppError> {
    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO ledger_entries (
                id, transaction_id, wallet_id, entry_type, amount,
                balance_before, balance_after, description, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id)
        .bind(entry.transaction_id)
        .bind(entry.wallet_id)
        .bind(entry.entry_type)
        .bind(entry.amount)
        .bind(entry.balance_before)
        .bind(entry.balance_after)
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn list_by_transaction(
    pool: &DbPool,
    transaction_id: Uuid,
) -> Result<Vec<LedgerEntry>, AppError> {
    let entries = sqlx::query_as::<_, LedgerEntry>(
        "SELECT * FROM ledger_entries WHERE transaction_id = $1 ORDER BY created_at ASC",
    )
    .bind(transaction_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn list_by_wallet(
    pool: &DbPool,
    wallet_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<LedgerEntry>, AppError> {
    let entries = sqlx::query_as::<_, LedgerEntry>(
        r#"
        SELECT * FROM ledger_entries
        WHERE wallet_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(wallet_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn count_by_wallet(pool: &DbPool, wallet_id: Uuid) -> Result<i64, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ledger_entries WHERE wallet_id = $1")
        .bind(wallet_id)
        .fetch_one(pool)
        .await?;

    Ok(total)
}

/// Total credits and debits for a wallet, read inside the caller's
/// transaction so the sums are consistent with any other read in it.
pub async fn sums_for_wallet(
    tx: &mut DbTx<'_>,
    wallet_id: Uuid,
) -> Result<(i64, i64), AppError> {
    let (credits, debits): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN entry_type = 'credit' THEN amount ELSE 0 END), 0)::BIGINT,
            COALESCE(SUM(CASE WHEN entry_type = 'debit' THEN amount ELSE 0 END), 0)::BIGINT
        FROM ledger_entries
        WHERE wallet_id = $1
        "#,
    )
    .bind(wallet_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok((credits, debits))
}
