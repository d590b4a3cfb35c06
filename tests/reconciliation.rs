//! Integration tests for the balance reconciler.
//!
//! Requires PostgreSQL reachable via TEST_DATABASE_URL.

mod common;

use uuid::Uuid;

use dompet::{
    error::AppError,
    models::transaction::{TopupRequest, TransferRequest},
    services::{ledger_service, reconciliation_service},
};

const CURRENCY: &str = "IDR";

#[tokio::test]
async fn fresh_wallet_reconciles_to_zero() {
    let pool = common::setup_db().await;
    let (_, wallet) = common::create_funded_user(&pool, 0).await;

    let validation = reconciliation_service::validate_balance(&pool, wallet.id)
        .await
        .unwrap();

    assert!(validation.is_valid);
    assert_eq!(validation.current_balance, 0);
    assert_eq!(validation.calculated_balance, 0);
    assert_eq!(validation.difference, 0);
}

#[tokio::test]
async fn wallet_reconciles_after_mixed_operations() {
    let pool = common::setup_db().await;
    let (sender, sender_wallet) = common::create_funded_user(&pool, 0).await;
    let (receiver, receiver_wallet) = common::create_funded_user(&pool, 0).await;

    ledger_service::topup(
        &pool,
        CURRENCY,
        TopupRequest {
            user_id: sender.id,
            amount: 10_000_000,
            channel_code: "BANK_A".to_string(),
            idempotency_key: common::idempotency_key("recon-topup"),
        },
    )
    .await
    .unwrap();

    ledger_service::transfer(
        &pool,
        CURRENCY,
        TransferRequest {
            user_id: sender.id,
            to_user_id: receiver.id,
            amount: 4_000_000,
            pin: common::TEST_PIN.to_string(),
            description: Some("dinner split".to_string()),
            idempotency_key: common::idempotency_key("recon-transfer"),
        },
    )
    .await
    .unwrap();

    let sender_validation = reconciliation_service::validate_balance(&pool, sender_wallet.id)
        .await
        .unwrap();
    assert!(sender_validation.is_valid);
    assert_eq!(sender_validation.current_balance, 6_000_000);
    assert_eq!(sender_validation.calculated_balance, 6_000_000);

    let receiver_validation = reconciliation_service::validate_balance(&pool, receiver_wallet.id)
        .await
        .unwrap();
    assert!(receiver_validation.is_valid);
    assert_eq!(receiver_validation.current_balance, 4_000_000);
}

#[tokio::test]
async fn drifted_balance_is_detected() {
    let pool = common::setup_db().await;
    let (user, wallet) = common::create_funded_user(&pool, 0).await;

    ledger_service::topup(
        &pool,
        CURRENCY,
        TopupRequest {
            user_id: user.id,
            amount: 5_000_000,
            channel_code: "BANK_A".to_string(),
            idempotency_key: common::idempotency_key("drift-topup"),
        },
    )
    .await
    .unwrap();

    // Simulate corruption: write a balance the ledger cannot explain.
    sqlx::query("UPDATE wallets SET balance = balance + 123 WHERE id = $1")
        .bind(wallet.id)
        .execute(&pool)
        .await
        .unwrap();

    let validation = reconciliation_service::validate_balance(&pool, wallet.id)
        .await
        .unwrap();

    assert!(!validation.is_valid);
    assert_eq!(validation.current_balance, 5_000_123);
    assert_eq!(validation.calculated_balance, 5_000_000);
    assert_eq!(validation.difference, 123);
    assert!(validation.message.contains("mismatch"));
}

#[tokio::test]
async fn missing_wallet_is_reported() {
    let pool = common::setup_db().await;

    let err = reconciliation_service::validate_balance(&pool, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::WalletNotFound));
}
