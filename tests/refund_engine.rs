//! Integration tests for the refund engine.
//!
//! Requires PostgreSQL reachable via TEST_DATABASE_URL.

mod common;

use uuid::Uuid;

use dompet::{
    error::AppError,
    models::ledger::EntryType,
    models::transaction::{
        RefundRequest, ReverseRequest, TopupRequest, TransactionStatus, TransactionType,
        TransferRequest,
    },
    repository,
    services::{ledger_service, reconciliation_service, refund_service},
};

const CURRENCY: &str = "IDR";
const REASON: &str = "dispute resolved in favor of sender";

fn refund_request(original: Uuid, amount: Option<i64>, key: &str) -> RefundRequest {
    RefundRequest {
        admin_id: Uuid::new_v4(),
        original_transaction_id: original,
        reason: REASON.to_string(),
        amount,
        idempotency_key: key.to_string(),
    }
}

fn reverse_request(original: Uuid, key: &str) -> ReverseRequest {
    ReverseRequest {
        admin_id: Uuid::new_v4(),
        original_transaction_id: original,
        reason: REASON.to_string(),
        idempotency_key: key.to_string(),
    }
}

/// Set up a committed 3M transfer: sender left with 7M, receiver holding 3M.
async fn committed_transfer(pool: &sqlx::PgPool) -> (Uuid, Uuid, Uuid) {
    let (sender, sender_wallet) = common::create_funded_user(pool, 10_000_000).await;
    let (receiver, _) = common::create_funded_user(pool, 0).await;

    let response = ledger_service::transfer(
        pool,
        CURRENCY,
        TransferRequest {
            user_id: sender.id,
            to_user_id: receiver.id,
            amount: 3_000_000,
            pin: common::TEST_PIN.to_string(),
            description: None,
            idempotency_key: common::idempotency_key("setup-transfer"),
        },
    )
    .await
    .expect("setup transfer failed");

    (response.transaction_id, sender_wallet.id, receiver.id)
}

/// Set up a committed 5M topup on a fresh wallet.
async fn committed_topup(pool: &sqlx::PgPool) -> (Uuid, Uuid) {
    let (user, wallet) = common::create_funded_user(pool, 0).await;

    let response = ledger_service::topup(
        pool,
        CURRENCY,
        TopupRequest {
            user_id: user.id,
            amount: 5_000_000,
            channel_code: "BANK_A".to_string(),
            idempotency_key: common::idempotency_key("setup-topup"),
        },
    )
    .await
    .expect("setup topup failed");

    (response.transaction_id, wallet.id)
}

#[tokio::test]
async fn full_reversal_credits_the_sender() {
    let pool = common::setup_db().await;
    let (original_id, sender_wallet_id, _) = committed_transfer(&pool).await;

    let response = refund_service::reverse(
        &pool,
        reverse_request(original_id, &common::idempotency_key("reverse")),
    )
    .await
    .expect("reverse failed");

    assert_eq!(response.original_transaction_id, original_id);
    assert_eq!(response.amount, 3_000_000);
    assert_eq!(response.status, TransactionStatus::Success);

    // The refund is a NEW topup-kind transaction forward-linked to the
    // original; the original's ledger entries are untouched.
    let refund_tx = repository::transactions::find_by_id(&pool, response.refund_transaction_id)
        .await
        .unwrap();
    assert_eq!(refund_tx.transaction_type, TransactionType::Topup);
    assert_eq!(refund_tx.refunds_transaction_id, Some(original_id));
    assert_eq!(refund_tx.to_wallet_id, Some(sender_wallet_id));

    let entries = repository::ledger_entries::list_by_transaction(&pool, refund_tx.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_type, EntryType::Credit);
    assert_eq!(entries[0].balance_before, 7_000_000);
    assert_eq!(entries[0].balance_after, 10_000_000);

    let original_entries = repository::ledger_entries::list_by_transaction(&pool, original_id)
        .await
        .unwrap();
    assert_eq!(original_entries.len(), 2);

    // Fully refunded: the original transitions to reversed.
    let original = repository::transactions::find_by_id(&pool, original_id).await.unwrap();
    assert_eq!(original.status, TransactionStatus::Reversed);

    let sender_wallet = repository::wallets::find_by_id(&pool, sender_wallet_id)
        .await
        .unwrap();
    assert_eq!(sender_wallet.balance, 10_000_000);

    let validation = reconciliation_service::validate_balance(&pool, sender_wallet_id)
        .await
        .unwrap();
    assert!(validation.is_valid);
}

#[tokio::test]
async fn topup_refund_credits_the_topup_wallet() {
    let pool = common::setup_db().await;
    let (original_id, wallet_id) = committed_topup(&pool).await;

    let response = refund_service::refund(
        &pool,
        refund_request(original_id, Some(2_000_000), &common::idempotency_key("partial")),
    )
    .await
    .expect("partial refund failed");

    assert_eq!(response.amount, 2_000_000);

    // Partial refund: original stays success.
    let original = repository::transactions::find_by_id(&pool, original_id).await.unwrap();
    assert_eq!(original.status, TransactionStatus::Success);

    let wallet = repository::wallets::find_by_id(&pool, wallet_id).await.unwrap();
    assert_eq!(wallet.balance, 7_000_000);
}

#[tokio::test]
async fn cumulative_refunds_cannot_exceed_original() {
    let pool = common::setup_db().await;
    let (original_id, _) = committed_topup(&pool).await;

    refund_service::refund(
        &pool,
        refund_request(original_id, Some(2_000_000), &common::idempotency_key("part-1")),
    )
    .await
    .expect("first partial refund failed");

    // 2M refunded of 5M; another 4M would breach the ceiling.
    let err = refund_service::refund(
        &pool,
        refund_request(original_id, Some(4_000_000), &common::idempotency_key("part-2")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::RefundExceedsOriginal));

    // Topping the remainder off is fine and flips the original to reversed.
    refund_service::refund(
        &pool,
        refund_request(original_id, Some(3_000_000), &common::idempotency_key("part-3")),
    )
    .await
    .expect("closing refund failed");

    let original = repository::transactions::find_by_id(&pool, original_id).await.unwrap();
    assert_eq!(original.status, TransactionStatus::Reversed);

    // Reversed originals accept no further refunds.
    let err = refund_service::refund(
        &pool,
        refund_request(original_id, Some(1), &common::idempotency_key("part-4")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::OriginalNotSuccess));
}

#[tokio::test]
async fn single_refund_cannot_exceed_original() {
    let pool = common::setup_db().await;
    let (original_id, _) = committed_topup(&pool).await;

    let err = refund_service::refund(
        &pool,
        refund_request(original_id, Some(6_000_000), &common::idempotency_key("too-big")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::RefundExceedsOriginal));
}

#[tokio::test]
async fn refund_requires_successful_original() {
    let pool = common::setup_db().await;
    let (user, wallet) = common::create_funded_user(&pool, 0).await;

    // Insert a pending transaction directly.
    let now = chrono::Utc::now();
    let pending = dompet::models::transaction::Transaction {
        id: Uuid::new_v4(),
        idempotency_key: common::idempotency_key("pending"),
        user_id: user.id,
        transaction_type: TransactionType::Topup,
        amount: 1_000_000,
        currency: CURRENCY.to_string(),
        status: TransactionStatus::Pending,
        from_wallet_id: None,
        to_wallet_id: Some(wallet.id),
        refunds_transaction_id: None,
        reference_id: None,
        description: "pending topup".to_string(),
        metadata: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
    };
    let mut tx = pool.begin().await.unwrap();
    repository::transactions::insert(&mut tx, &pending).await.unwrap();
    tx.commit().await.unwrap();

    let err = refund_service::refund(
        &pool,
        refund_request(pending.id, None, &common::idempotency_key("refund-pending")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::OriginalNotSuccess));
}

#[tokio::test]
async fn refund_reason_must_be_meaningful() {
    let pool = common::setup_db().await;
    let (original_id, _) = committed_topup(&pool).await;

    let mut request = refund_request(original_id, None, &common::idempotency_key("short"));
    request.reason = "too short".to_string();

    let err = refund_service::refund(&pool, request).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}

#[tokio::test]
async fn refund_replays_idempotency_key() {
    let pool = common::setup_db().await;
    let (original_id, wallet_id) = committed_topup(&pool).await;
    let key = common::idempotency_key("refund-replay");

    let first = refund_service::refund(&pool, refund_request(original_id, Some(1_000_000), &key))
        .await
        .unwrap();
    let second = refund_service::refund(&pool, refund_request(original_id, Some(1_000_000), &key))
        .await
        .unwrap();

    assert_eq!(second.refund_transaction_id, first.refund_transaction_id);
    assert_eq!(second.original_transaction_id, original_id);

    // Credited exactly once.
    let wallet = repository::wallets::find_by_id(&pool, wallet_id).await.unwrap();
    assert_eq!(wallet.balance, 6_000_000);
}

#[tokio::test]
async fn refund_rejects_frozen_destination() {
    let pool = common::setup_db().await;
    let (original_id, wallet_id) = committed_topup(&pool).await;

    // Freeze the wallet the refund would credit.
    dompet::services::wallet_admin_service::freeze(
        &pool,
        Uuid::new_v4(),
        wallet_id,
        "suspicious account activity",
    )
    .await
    .unwrap();

    let err = refund_service::refund(
        &pool,
        refund_request(original_id, None, &common::idempotency_key("frozen-refund")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::WalletNotActive));
}

#[tokio::test]
async fn refund_writes_audit_entry_in_same_commit() {
    let pool = common::setup_db().await;
    let (original_id, _, _) = committed_transfer(&pool).await;

    refund_service::reverse(
        &pool,
        reverse_request(original_id, &common::idempotency_key("audited")),
    )
    .await
    .unwrap();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_logs WHERE resource_id = $1 AND action = 'reverse_transaction'",
    )
    .bind(original_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn refund_history_lists_linked_refunds() {
    let pool = common::setup_db().await;
    let (original_id, _) = committed_topup(&pool).await;

    refund_service::refund(
        &pool,
        refund_request(original_id, Some(1_000_000), &common::idempotency_key("hist-1")),
    )
    .await
    .unwrap();
    refund_service::refund(
        &pool,
        refund_request(original_id, Some(2_000_000), &common::idempotency_key("hist-2")),
    )
    .await
    .unwrap();

    let history = refund_service::get_refund_history(&pool, original_id).await.unwrap();
    assert_eq!(history.len(), 2);
    let total: i64 = history.iter().map(|item| item.amount).sum();
    assert_eq!(total, 3_000_000);

    // The bare admin-supplied reason, not the generated description.
    for item in &history {
        assert_eq!(item.reason, REASON);
    }
}
