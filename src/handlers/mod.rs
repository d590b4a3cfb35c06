//! HTTP request handlers.
//!
//! Handlers only bind request shapes and delegate to the services; no
//! business rule lives here. Caller identity (user or admin id) arrives in
//! the request body; token extraction and access control belong to the
//! gateway in front of this service.

/// Administrative operations: freeze/unfreeze, refund/reverse
pub mod admin;

/// Health check handler for monitoring
pub mod health;

/// Topup, transfer, and transaction lookups
pub mod transactions;

/// Wallet balances, history, and reconciliation
pub mod wallets;
