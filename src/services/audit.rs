use sqlx::PgPool;
use uuid::Uuid;

use crate::db::tenant::schema_name;

/// What happened to a menu or schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    MenuCreated,
    MenuDeleted,
    ScheduleCreated,
    ScheduleUpdated,
    ScheduleDeleted,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::MenuCreated => "menu.created",
            AuditAction::MenuDeleted => "menu.deleted",
            AuditAction::ScheduleCreated => "schedule.created",
            AuditAction::ScheduleUpdated => "schedule.updated",
            AuditAction::ScheduleDeleted => "schedule.deleted",
        }
    }

    pub fn resource_type(self) -> &'static str {
        match self {
            AuditAction::MenuCreated | AuditAction::MenuDeleted => "menu",
            _ => "menu_schedule",
        }
    }
}

/// An audit log entry to record.
pub struct AuditEntry {
    pub user_id:        Option<Uuid>,
    pub action:         AuditAction,
    pub resource_id:    Uuid,
    pub resource_label: Option<String>,
}

/// Fire-and-forget audit log entry.
/// Spawns a background task; it never blocks the request handler and
/// never propagates errors (logs a warning on failure).
pub fn log(pool: PgPool, tenant: &str, entry: AuditEntry) {
    let schema = schema_name(tenant);

    tokio::spawn(async move {
        let res = sqlx::query(&format!(
            r#"INSERT INTO "{schema}".audit_log
                (user_id, action, resource_type, resource_id, resource_label)
             VALUES ($1, $2, $3, $4, $5)"#
        ))
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(entry.action.resource_type())
        .bind(entry.resource_id.to_string())
        .bind(entry.resource_label)
        .execute(&pool)
        .await;

        if let Err(e) = res {
            tracing::warn!("audit log insert failed for schema {schema}: {e}");
        }
    });
}
