//! Multi-wallet money-movement service.
//!
//! Every balance change flows through a double-entry ledger inside a single
//! locking database transaction. The library crate exists so integration
//! tests can drive the engines directly; the binary in `main.rs` wires the
//! same modules behind an HTTP router.

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
