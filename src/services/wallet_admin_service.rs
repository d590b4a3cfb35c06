//! Wallet state controller: freeze and unfreeze.
//!
//! Both operations touch only the wallet's status and the audit trail,
//! never its balance or ledger entries. The status write happens under the
//! wallet's row lock, and the audit entry commits in the same atomic unit.

use serde_json::json;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::audit::{AuditAction, AuditLog},
    models::wallet::WalletStatus,
    repository,
};

/// Freeze an active wallet. Frozen wallets refuse debits and credits at
/// every lock-then-check point; reads still work.
pub async fn freeze(
    pool: &DbPool,
    admin_id: Uuid,
    wallet_id: Uuid,
    reason: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let wallet = repository::wallets::lock_for_update(&mut tx, wallet_id).await?;
    match wallet.status {
        WalletStatus::Frozen => {
            tx.rollback().await?;
            return Err(AppError::InvalidRequest(
                "Wallet is already frozen".to_string(),
            ));
        }
        WalletStatus::Closed => {
            // Closed is terminal; no transitions out.
            tx.rollback().await?;
            return Err(AppError::InvalidRequest("Wallet is closed".to_string()));
        }
        WalletStatus::Active => {}
    }

    repository::wallets::update_status(&mut tx, wallet_id, WalletStatus::Frozen).await?;

    let audit = AuditLog::new(
        Some(admin_id),
        AuditAction::FreezeWallet,
        "wallet",
        Some(wallet_id),
        format!(
            "Froze wallet {}. Reason: {reason}",
            &wallet_id.to_string()[..8]
        ),
    )
    .with_values(
        json!({ "status": WalletStatus::Active }),
        json!({ "status": WalletStatus::Frozen }),
    );
    repository::audit_logs::insert(&mut tx, &audit).await?;

    tx.commit().await?;

    tracing::info!(%wallet_id, %admin_id, "wallet frozen");
    Ok(())
}

/// Unfreeze a frozen wallet, returning it to active.
pub async fn unfreeze(
    pool: &DbPool,
    admin_id: Uuid,
    wallet_id: Uuid,
    reason: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let wallet = repository::wallets::lock_for_update(&mut tx, wallet_id).await?;
    match wallet.status {
        WalletStatus::Active => {
            tx.rollback().await?;
            return Err(AppError::InvalidRequest(
                "Wallet is already active".to_string(),
            ));
        }
        WalletStatus::Closed => {
            tx.rollback().await?;
            return Err(AppError::InvalidRequest("Wallet is closed".to_string()));
        }
        WalletStatus::Frozen => {}
    }

    repository::wallets::update_status(&mut tx, wallet_id, WalletStatus::Active).await?;

    let audit = AuditLog::new(
        Some(admin_id),
        AuditAction::UnfreezeWallet,
        "wallet",
        Some(wallet_id),
        format!(
            "Unfroze wallet {}. Reason: {reason}",
            &wallet_id.to_string()[..8]
        ),
    )
    .with_values(
        json!({ "status": WalletStatus::Frozen }),
        json!({ "status": WalletStatus::Active }),
    );
    repository::audit_logs::insert(&mut tx, &audit).await?;

    tx.commit().await?;

    tracing::info!(%wallet_id, %admin_id, "wallet unfrozen");
    Ok(())
}
