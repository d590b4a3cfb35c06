//! Persistence layer: one module of query functions per table.
//!
//! Reads take the pool and run as non-locking snapshot reads. Writes take an
//! open [`crate::db::DbTx`], so a write outside a database transaction is
//! unrepresentable. Row locks acquired with `SELECT ... FOR UPDATE` are held
//! until the transaction commits or rolls back.

pub mod audit_logs;
pub mod ledger_entries;
pub mod transactions;
pub mod users;
pub mod wallets;
