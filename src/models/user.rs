//! User entity.
//!
//! Registration and authentication live outside this service; the engine
//! only reads users to resolve wallet ownership and verify the transfer PIN.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record from the database.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub full_name: String,

    /// bcrypt hash of the login password. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// bcrypt hash of the 6-digit transfer PIN; `None` until the user sets
    /// one. Never serialized.
    #[serde(skip_serializing)]
    pub pin_hash: Option<String>,

    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
    Blocked,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
