//! Query functions for the `audit_logs` table. Append-only.

use crate::{db::DbTx, error::AppError, models::audit::AuditLog};

/// Append an audit entry within the caller's transaction, making it part
/// of the same atomic unit as the action it records.
pub async fn insert(tx: &mut DbTx<'_>, log: &AuditLog) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (
            id, admin_id, action, resource_type, resource_id, description,
            ip_address, user_agent, before_value, after_value, metadata, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(log.id)
    .bind(log.admin_id)
    .bind(log.action)
    .bind(&log.resource_type)
    .bind(log.resource_id)
    .bind(&log.description)
    .bind(&log.ip_address)
    .bind(&log.user_agent)
    .bind(&log.before_value)
    .bind(&log.after_value)
    .bind(&log.metadata)
    .bind(log.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
