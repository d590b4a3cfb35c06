//! Integration tests for the wallet state controller (freeze/unfreeze).
//!
//! Requires PostgreSQL reachable via TEST_DATABASE_URL.

mod common;

use uuid::Uuid;

use dompet::{
    error::AppError,
    models::wallet::WalletStatus,
    repository,
    services::wallet_admin_service,
};

#[tokio::test]
async fn freeze_then_unfreeze_round_trip() {
    let pool = common::setup_db().await;
    let (user, wallet) = common::create_funded_user(&pool, 5_000_000).await;
    let admin_id = Uuid::new_v4();

    wallet_admin_service::freeze(&pool, admin_id, wallet.id, "suspicious account activity")
        .await
        .expect("freeze failed");

    let frozen = repository::wallets::find_by_id(&pool, wallet.id).await.unwrap();
    assert_eq!(frozen.status, WalletStatus::Frozen);
    assert_eq!(frozen.user_id, user.id);

    wallet_admin_service::unfreeze(&pool, admin_id, wallet.id, "cleared by compliance review")
        .await
        .expect("unfreeze failed");

    let active = repository::wallets::find_by_id(&pool, wallet.id).await.unwrap();
    assert_eq!(active.status, WalletStatus::Active);
}

#[tokio::test]
async fn freeze_never_touches_balance_or_ledger() {
    let pool = common::setup_db().await;
    let (_, wallet) = common::create_funded_user(&pool, 5_000_000).await;

    wallet_admin_service::freeze(&pool, Uuid::new_v4(), wallet.id, "suspicious account activity")
        .await
        .unwrap();

    let frozen = repository::wallets::find_by_id(&pool, wallet.id).await.unwrap();
    assert_eq!(frozen.balance, 5_000_000);

    let entries = repository::ledger_entries::count_by_wallet(&pool, wallet.id)
        .await
        .unwrap();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn freeze_rejects_already_frozen_wallet() {
    let pool = common::setup_db().await;
    let user = common::create_user(&pool).await;
    let wallet =
        common::create_wallet_with_status(&pool, user.id, 0, WalletStatus::Frozen).await;

    let err = wallet_admin_service::freeze(&pool, Uuid::new_v4(), wallet.id, "already on hold")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}

#[tokio::test]
async fn unfreeze_rejects_active_wallet() {
    let pool = common::setup_db().await;
    let (_, wallet) = common::create_funded_user(&pool, 0).await;

    let err = wallet_admin_service::unfreeze(&pool, Uuid::new_v4(), wallet.id, "nothing to do")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}

#[tokio::test]
async fn closed_wallet_is_terminal() {
    let pool = common::setup_db().await;
    let user = common::create_user(&pool).await;
    let wallet =
        common::create_wallet_with_status(&pool, user.id, 0, WalletStatus::Closed).await;

    let err = wallet_admin_service::freeze(&pool, Uuid::new_v4(), wallet.id, "closed account")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    let err = wallet_admin_service::unfreeze(&pool, Uuid::new_v4(), wallet.id, "closed account")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}

#[tokio::test]
async fn missing_wallet_is_reported() {
    let pool = common::setup_db().await;

    let err = wallet_admin_service::freeze(&pool, Uuid::new_v4(), Uuid::new_v4(), "no such wallet")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::WalletNotFound));
}

#[tokio::test]
async fn freeze_and_unfreeze_are_audited_with_snapshots() {
    let pool = common::setup_db().await;
    let (_, wallet) = common::create_funded_user(&pool, 0).await;
    let admin_id = Uuid::new_v4();

    wallet_admin_service::freeze(&pool, admin_id, wallet.id, "suspicious account activity")
        .await
        .unwrap();
    wallet_admin_service::unfreeze(&pool, admin_id, wallet.id, "cleared by compliance review")
        .await
        .unwrap();

    let rows: Vec<(String, serde_json::Value, serde_json::Value)> = sqlx::query_as(
        r#"
        SELECT action, before_value, after_value
        FROM audit_logs
        WHERE resource_id = $1 AND admin_id = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(wallet.id)
    .bind(admin_id)
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, "freeze_wallet");
    assert_eq!(rows[0].1, serde_json::json!({ "status": "active" }));
    assert_eq!(rows[0].2, serde_json::json!({ "status": "frozen" }));
    assert_eq!(rows[1].0, "unfreeze_wallet");
}
