//! Business logic services.
//!
//! The four engines live here, separated from HTTP handlers: every write
//! path owns exactly one database transaction and every invariant check
//! happens under the row locks that transaction holds.

/// Topup and transfer (the wallet ledger engine)
pub mod ledger_service;

/// Balance-vs-ledger verification
pub mod reconciliation_service;

/// Refund and reversal
pub mod refund_service;

/// Freeze and unfreeze (wallet state controller)
pub mod wallet_admin_service;

/// Balance and history reads
pub mod wallet_service;
