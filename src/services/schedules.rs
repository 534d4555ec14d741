use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::tenant::schema_name,
    models::schedule::{MenuSchedule, ScheduleDraft},
};

pub struct ScheduleService;

impl ScheduleService {
    /// All schedules of one menu, in a stable order.
    pub async fn list_for_menu(
        pool: &PgPool,
        tenant: &str,
        menu_id: Uuid,
    ) -> anyhow::Result<Vec<MenuSchedule>> {
        let schema = schema_name(tenant);
        let schedules = sqlx::query_as::<_, MenuSchedule>(&format!(
            r#"SELECT * FROM "{schema}".menu_schedules
               WHERE menu_id = $1
               ORDER BY priority DESC, id"#
        ))
        .bind(menu_id)
        .fetch_all(pool)
        .await?;
        Ok(schedules)
    }

    /// Every schedule of the tenant, grouped by menu.
    pub async fn list_all(pool: &PgPool, tenant: &str) -> anyhow::Result<Vec<MenuSchedule>> {
        let schema = schema_name(tenant);
        let schedules = sqlx::query_as::<_, MenuSchedule>(&format!(
            r#"SELECT * FROM "{schema}".menu_schedules ORDER BY menu_id, priority DESC, id"#
        ))
        .fetch_all(pool)
        .await?;
        Ok(schedules)
    }

    pub async fn find(
        pool: &PgPool,
        tenant: &str,
        id: Uuid,
    ) -> anyhow::Result<Option<MenuSchedule>> {
        let schema = schema_name(tenant);
        let schedule = sqlx::query_as::<_, MenuSchedule>(&format!(
            r#"SELECT * FROM "{schema}".menu_schedules WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(schedule)
    }

    pub async fn create(
        pool: &PgPool,
        tenant: &str,
        menu_id: Uuid,
        draft: &ScheduleDraft,
    ) -> anyhow::Result<MenuSchedule> {
        let schema = schema_name(tenant);
        let schedule = sqlx::query_as::<_, MenuSchedule>(&format!(
            r#"INSERT INTO "{schema}".menu_schedules
                   (menu_id, start_time, end_time, days, priority, timezone,
                    is_active, allow_overlap, start_date, end_date, badge)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#
        ))
        .bind(menu_id)
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(&draft.days)
        .bind(draft.priority)
        .bind(&draft.timezone)
        .bind(draft.is_active)
        .bind(draft.allow_overlap)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(&draft.badge)
        .fetch_one(pool)
        .await?;
        Ok(schedule)
    }

    /// Overwrites every editable column with the validated draft.
    pub async fn update(
        pool: &PgPool,
        tenant: &str,
        id: Uuid,
        draft: &ScheduleDraft,
    ) -> anyhow::Result<MenuSchedule> {
        let schema = schema_name(tenant);
        let schedule = sqlx::query_as::<_, MenuSchedule>(&format!(
            r#"UPDATE "{schema}".menu_schedules
               SET start_time = $1,
                   end_time = $2,
                   days = $3,
                   priority = $4,
                   timezone = $5,
                   is_active = $6,
                   allow_overlap = $7,
                   start_date = $8,
                   end_date = $9,
                   badge = $10
               WHERE id = $11
               RETURNING *"#
        ))
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(&draft.days)
        .bind(draft.priority)
        .bind(&draft.timezone)
        .bind(draft.is_active)
        .bind(draft.allow_overlap)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(&draft.badge)
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(schedule)
    }

    /// Returns `false` when no such schedule existed.
    pub async fn delete(pool: &PgPool, tenant: &str, id: Uuid) -> anyhow::Result<bool> {
        let schema = schema_name(tenant);
        let result = sqlx::query(&format!(
            r#"DELETE FROM "{schema}".menu_schedules WHERE id = $1"#
        ))
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
