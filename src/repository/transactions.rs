//! Query functions for the `transactions` table.

use uuid::Uuid;

use crate::{
    db::{DbPool, DbTx},
    error::AppError,
    models::transaction::{RefundHistoryItem, Transaction, TransactionStatus},
};

/// Name Postgres assigns to the idempotency-key UNIQUE constraint.
const IDEMPOTENCY_KEY_CONSTRAINT: &str = "transactions_idempotency_key_key";

/// Insert a transaction row.
///
/// A unique-constraint violation on the idempotency key maps to
/// [`AppError::DuplicateIdempotencyKey`]: it means another request bearing
/// the same key committed first. Callers roll back and re-dispatch to the
/// idempotency lookup.
pub async fn insert(tx: &mut DbTx<'_>, transaction: &Transaction) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO transactions (
            id, idempotency_key, user_id, transaction_type, amount, currency,
            status, from_wallet_id, to_wallet_id, refunds_transaction_id,
            reference_id, description, metadata, created_at, updated_at, completed_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#,
    )
    .bind(transaction.id)
    .bind(&transaction.idempotency_key)
    .bind(transaction.user_id)
    .bind(transaction.transaction_type)
    .bind(transaction.amount)
    .bind(&transaction.currency)
    .bind(transaction.status)
    .bind(transaction.from_wallet_id)
    .bind(transaction.to_wallet_id)
    .bind(transaction.refunds_transaction_id)
    .bind(&transaction.reference_id)
    .bind(&transaction.description)
    .bind(&transaction.metadata)
    .bind(transaction.created_at)
    .bind(transaction.updated_at)
    .bind(transaction.completed_at)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(IDEMPOTENCY_KEY_CONSTRAINT)
                {
                    return Err(AppError::DuplicateIdempotencyKey);
                }
            }
            Err(AppError::Database(e))
        }
    }
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Transaction, AppError> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::TransactionNotFound)
}

/// Fetch a transaction row and hold an exclusive lock on it until commit.
///
/// Used by the refund engine: the lock serializes concurrent refunds of the
/// same original so the cumulative-ceiling check cannot race, and covers
/// the `success -> reversed` status transition.
pub async fn lock_for_update(tx: &mut DbTx<'_>, id: Uuid) -> Result<Transaction, AppError> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::TransactionNotFound)
}

/// Look up a transaction by idempotency key.
///
/// `None` means no prior intent with this key; it is not an error in
/// callers' control flow.
pub async fn find_by_idempotency_key(
    pool: &DbPool,
    idempotency_key: &str,
) -> Result<Option<Transaction>, AppError> {
    let transaction =
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE idempotency_key = $1")
            .bind(idempotency_key)
            .fetch_optional(pool)
            .await?;

    Ok(transaction)
}

pub async fn list_by_user(
    pool: &DbPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Transaction>, AppError> {
    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT * FROM transactions
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

pub async fn update_status(
    tx: &mut DbTx<'_>,
    id: Uuid,
    status: TransactionStatus,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE transactions
        SET status = $1,
            updated_at = NOW(),
            completed_at = CASE
                WHEN $1 IN ('success', 'failed', 'reversed') THEN NOW()
                ELSE completed_at
            END
        WHERE id = $2
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::TransactionNotFound);
    }

    Ok(())
}

/// Sum of all successful refunds already linked to an original transaction.
///
/// Must run while the original's row lock is held so a concurrent refund
/// cannot slip between the read and the insert.
pub async fn sum_refunds_of(tx: &mut DbTx<'_>, original_id: Uuid) -> Result<i64, AppError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)::BIGINT
        FROM transactions
        WHERE refunds_transaction_id = $1 AND status = 'success'
        "#,
    )
    .bind(original_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(total)
}

/// All refunds linked to an original, newest first.
pub async fn list_refunds_of(
    pool: &DbPool,
    original_id: Uuid,
) -> Result<Vec<RefundHistoryItem>, AppError> {
    let history = sqlx::query_as::<_, RefundHistoryItem>(
        r#"
        SELECT
            id AS refund_transaction_id,
            amount,
            COALESCE(metadata->>'reason', '') AS reason,
            status,
            created_at
        FROM transactions
        WHERE refunds_transaction_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(original_id)
    .fetch_all(pool)
    .await?;

    Ok(history)
}
