//! Wallet entity and wallet read DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ledger::LedgerEntry;

/// Represents a wallet record from the database.
///
/// # Balance Storage
///
/// `balance` is a signed 64-bit integer in the currency's minor unit (sen
/// for IDR: Rp 1 = 100 sen). No decimal or floating type appears anywhere
/// in balance arithmetic. The invariant `balance >= 0` is enforced by the
/// engine under the row lock and backstopped by a CHECK constraint.
///
/// A user has at most one wallet per type (`UNIQUE(user_id, wallet_type)`).
/// Wallets are never deleted; lifecycle end is `status = closed`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_type: WalletType,

    /// Current balance in minor units. Mutated only inside a locking
    /// database transaction via the balance-update path.
    pub balance: i64,

    pub currency: String,
    pub status: WalletStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    Main,
    Bonus,
    Cashback,
}

/// Wallet lifecycle status.
///
/// ```text
/// active --freeze--> frozen --unfreeze--> active
/// active --close--> closed   (terminal)
/// ```
///
/// Frozen is a soft lock: the engines refuse to append ledger entries to a
/// non-active wallet at every lock-then-check point, but reads still work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WalletStatus {
    Active,
    Frozen,
    Closed,
}

impl Wallet {
    pub fn is_active(&self) -> bool {
        self.status == WalletStatus::Active
    }

    pub fn has_sufficient_balance(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

// === API request/response models ===

/// Balance view of a single wallet.
#[derive(Debug, Serialize)]
pub struct WalletBalance {
    pub wallet_id: Uuid,
    pub wallet_type: WalletType,

    /// Integer minor units.
    pub balance: i64,

    /// Formatted for display, e.g. "Rp 100.000".
    pub balance_idr: String,

    pub currency: String,
    pub status: WalletStatus,
}

/// Paginated ledger history of a wallet.
#[derive(Debug, Serialize)]
pub struct WalletHistory {
    pub wallet_id: Uuid,
    pub current_balance: i64,
    pub entries: Vec<LedgerEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Result of reconciling a wallet's stored balance against its ledger.
#[derive(Debug, Serialize)]
pub struct BalanceValidation {
    pub wallet_id: Uuid,
    pub current_balance: i64,
    pub calculated_balance: i64,
    pub is_valid: bool,
    pub difference: i64,
    pub message: String,
}

/// Request to freeze or unfreeze a wallet.
#[derive(Debug, Deserialize)]
pub struct WalletStatusRequest {
    pub admin_id: Uuid,
    pub wallet_id: Uuid,
    pub reason: String,
}
