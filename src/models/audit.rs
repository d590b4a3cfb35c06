//! Administrative audit trail. Append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One audited administrative action.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AuditLog {
    pub id: Uuid,

    /// Acting admin; `None` for system-generated events.
    pub admin_id: Option<Uuid>,

    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    /// Resource state snapshots around the action.
    pub before_value: Option<serde_json::Value>,
    pub after_value: Option<serde_json::Value>,

    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    FreezeWallet,
    UnfreezeWallet,
    RefundTransaction,
    ReverseTransaction,
}

impl AuditLog {
    /// Build an audit entry for an action on a resource.
    pub fn new(
        admin_id: Option<Uuid>,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: Option<Uuid>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            admin_id,
            action,
            resource_type: resource_type.into(),
            resource_id,
            description: description.into(),
            ip_address: None,
            user_agent: None,
            before_value: None,
            after_value: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    /// Attach before/after snapshots.
    pub fn with_values(
        mut self,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Self {
        self.before_value = Some(before);
        self.after_value = Some(after);
        self
    }
}
