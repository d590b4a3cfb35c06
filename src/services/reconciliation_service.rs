//! Balance reconciler: the oracle for the conservation invariant.
//!
//! For any wallet, the stored balance must equal Σ(credits) − Σ(debits)
//! over its ledger entries. Both reads run inside one database transaction
//! so they observe a single consistent snapshot. No mutation.

use uuid::Uuid;

use crate::{db::DbPool, error::AppError, models::wallet::BalanceValidation, repository};

/// Compare a wallet's stored balance against its ledger.
pub async fn validate_balance(
    pool: &DbPool,
    wallet_id: Uuid,
) -> Result<BalanceValidation, AppError> {
    let mut tx = pool.begin().await?;

    let wallet = repository::wallets::find_by_id_in_tx(&mut tx, wallet_id).await?;
    let (credits, debits) =
        repository::ledger_entries::sums_for_wallet(&mut tx, wallet_id).await?;

    tx.commit().await?;

    let calculated_balance = credits - debits;
    let difference = wallet.balance - calculated_balance;
    let is_valid = difference == 0;

    let message = if is_valid {
        "Balance is valid".to_string()
    } else {
        tracing::error!(
            %wallet_id,
            stored = wallet.balance,
            calculated = calculated_balance,
            difference,
            "wallet balance does not match ledger"
        );
        format!("Balance mismatch! Difference: {difference}")
    };

    Ok(BalanceValidation {
        wallet_id,
        current_balance: wallet.balance,
        calculated_balance,
        is_valid,
        difference,
        message,
    })
}
