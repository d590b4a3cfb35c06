//! Double-entry ledger model.
//!
//! Ledger entries are strictly append-only: no UPDATE or DELETE ever
//! targets them. Every entry captures the wallet balance observed under the
//! row lock that produced it, so the ledger alone reconstructs every
//! balance the wallet has ever had.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// One side of a money movement for one wallet.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub wallet_id: Uuid,
    pub entry_type: EntryType,

    /// Always strictly positive; direction comes from `entry_type`.
    pub amount: i64,

    /// Wallet balance at the moment the wallet row was locked.
    pub balance_before: i64,

    /// `balance_before ± amount`; matches the wallet's stored balance
    /// after the update in the same transaction.
    pub balance_after: i64,

    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Debit,
    Credit,
}

impl LedgerEntry {
    /// Build a debit entry. Callers must have verified
    /// `balance_before >= amount` under the wallet's row lock, so the
    /// subtraction cannot underflow.
    pub fn debit(
        transaction_id: Uuid,
        wallet_id: Uuid,
        amount: i64,
        balance_before: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            wallet_id,
            entry_type: EntryType::Debit,
            amount,
            balance_before,
            balance_after: balance_before - amount,
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Build a credit entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BalanceOverflow`] when `balance_before + amount`
    /// does not fit in a signed 64-bit integer. The failed attempt is
    /// logged with its operands before the enclosing transaction rolls
    /// back.
    pub fn credit(
        transaction_id: Uuid,
        wallet_id: Uuid,
        amount: i64,
        balance_before: i64,
        description: impl Into<String>,
    ) -> Result<Self, AppError> {
        let balance_after = balance_before.checked_add(amount).ok_or_else(|| {
            tracing::error!(
                %wallet_id,
                balance_before,
                amount,
                "credit would overflow wallet balance"
            );
            AppError::BalanceOverflow
        })?;

        Ok(Self {
            id: Uuid::new_v4(),
            transaction_id,
            wallet_id,
            entry_type: EntryType::Credit,
            amount,
            balance_before,
            balance_after,
            description: description.into(),
            created_at: Utc::now(),
        })
    }
}
