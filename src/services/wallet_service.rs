//! Wallet read paths: balances and ledger history.
//!
//! Everything here is a non-locking snapshot read; no function in this
//! module may mutate balances or append ledger entries.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::ledger::LedgerEntry,
    models::wallet::{WalletBalance, WalletHistory, WalletType},
    repository,
};

/// Balance of one of a user's wallets.
pub async fn get_balance(
    pool: &DbPool,
    user_id: Uuid,
    wallet_type: WalletType,
) -> Result<WalletBalance, AppError> {
    let wallet = repository::wallets::find_by_user_and_type(pool, user_id, wallet_type).await?;

    Ok(WalletBalance {
        wallet_id: wallet.id,
        wallet_type: wallet.wallet_type,
        balance: wallet.balance,
        balance_idr: format_idr(wallet.balance),
        currency: wallet.currency,
        status: wallet.status,
    })
}

/// All wallets of a user.
pub async fn get_all_wallets(pool: &DbPool, user_id: Uuid) -> Result<Vec<WalletBalance>, AppError> {
    let wallets = repository::wallets::list_by_user(pool, user_id).await?;

    Ok(wallets
        .into_iter()
        .map(|wallet| WalletBalance {
            wallet_id: wallet.id,
            wallet_type: wallet.wallet_type,
            balance: wallet.balance,
            balance_idr: format_idr(wallet.balance),
            currency: wallet.currency,
            status: wallet.status,
        })
        .collect())
}

/// Paginated ledger history of a wallet, newest first.
pub async fn get_history(
    pool: &DbPool,
    wallet_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<WalletHistory, AppError> {
    let wallet = repository::wallets::find_by_id(pool, wallet_id).await?;
    let entries = repository::ledger_entries::list_by_wallet(pool, wallet_id, limit, offset).await?;
    let total = repository::ledger_entries::count_by_wallet(pool, wallet_id).await?;

    Ok(WalletHistory {
        wallet_id,
        current_balance: wallet.balance,
        entries,
        total,
        limit,
        offset,
    })
}

/// All ledger entries produced by one transaction, oldest first.
pub async fn get_transaction_entries(
    pool: &DbPool,
    transaction_id: Uuid,
) -> Result<Vec<LedgerEntry>, AppError> {
    repository::ledger_entries::list_by_transaction(pool, transaction_id).await
}

/// Format a minor-unit amount for display, e.g. 10_000_000 -> "Rp 100.000".
///
/// Presentation only: truncates the sen fraction and groups thousands with
/// dots. The engine itself never accepts or emits non-integer money.
pub fn format_idr(amount: i64) -> String {
    let major = amount / 100;
    let digits = major.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if major < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_idr;

    #[test]
    fn formats_minor_units_with_thousand_separators() {
        assert_eq!(format_idr(0), "Rp 0");
        assert_eq!(format_idr(5_000_000), "Rp 50.000");
        assert_eq!(format_idr(10_000_000), "Rp 100.000");
        assert_eq!(format_idr(123_456_789), "Rp 1.234.567");
        assert_eq!(format_idr(-5_000_000), "-Rp 50.000");
    }
}
