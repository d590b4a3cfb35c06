//! Data models representing database entities and API request/response types.

/// Administrative audit trail model
pub mod audit;
/// Double-entry ledger model
pub mod ledger;
/// Transaction model and money-movement DTOs
pub mod transaction;
/// User model (PIN holder)
pub mod user;
/// Wallet model and read DTOs
pub mod wallet;

use serde::Deserialize;

/// Pagination query parameters shared by history/list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,

    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Clamp to sane bounds: limit in 1..=100, offset >= 0.
    pub fn clamped(self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}
