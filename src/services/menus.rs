use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::tenant::schema_name,
    models::menu::{CreateMenuRequest, Menu},
};

pub struct MenuService;

impl MenuService {
    pub async fn list(pool: &PgPool, tenant: &str) -> anyhow::Result<Vec<Menu>> {
        let schema = schema_name(tenant);
        let menus = sqlx::query_as::<_, Menu>(&format!(
            r#"SELECT * FROM "{schema}".menus ORDER BY name"#
        ))
        .fetch_all(pool)
        .await?;
        Ok(menus)
    }

    /// Active menus only, as shown to customers.
    pub async fn list_active(pool: &PgPool, tenant: &str) -> anyhow::Result<Vec<Menu>> {
        let schema = schema_name(tenant);
        let menus = sqlx::query_as::<_, Menu>(&format!(
            r#"SELECT * FROM "{schema}".menus WHERE is_active = TRUE ORDER BY name"#
        ))
        .fetch_all(pool)
        .await?;
        Ok(menus)
    }

    pub async fn find(pool: &PgPool, tenant: &str, id: Uuid) -> anyhow::Result<Option<Menu>> {
        let schema = schema_name(tenant);
        let menu = sqlx::query_as::<_, Menu>(&format!(
            r#"SELECT * FROM "{schema}".menus WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(menu)
    }

    pub async fn create(
        pool: &PgPool,
        tenant: &str,
        req: &CreateMenuRequest,
    ) -> anyhow::Result<Menu> {
        let schema = schema_name(tenant);
        let menu = sqlx::query_as::<_, Menu>(&format!(
            r#"INSERT INTO "{schema}".menus (name, description, is_active)
               VALUES ($1, $2, $3)
               RETURNING *"#
        ))
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.is_active.unwrap_or(true))
        .fetch_one(pool)
        .await?;
        Ok(menu)
    }

    /// Deletes a menu and, through the FK cascade, its schedules.
    /// Returns `false` when no such menu existed.
    pub async fn delete(pool: &PgPool, tenant: &str, id: Uuid) -> anyhow::Result<bool> {
        let schema = schema_name(tenant);
        let result = sqlx::query(&format!(r#"DELETE FROM "{schema}".menus WHERE id = $1"#))
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
