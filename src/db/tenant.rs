use sqlx::PgPool;

/// Provision a per-restaurant PostgreSQL schema with all required tables.
/// Called when a restaurant is registered and again on every startup.
pub async fn provision_tenant_schema(pool: &PgPool, slug: &str) -> anyhow::Result<()> {
    let schema = schema_name(slug);

    // --- Create schema ---
    sqlx::raw_sql(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\""))
        .execute(pool)
        .await?;

    // --- Menus ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".menus (
            id          UUID PRIMARY KEY DEFAULT public.uuid_generate_v4(),
            name        VARCHAR(128) NOT NULL,
            description TEXT,
            is_active   BOOLEAN NOT NULL DEFAULT TRUE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- Menu schedules ---
    // Times are HH:MM text in the schedule's own timezone; days are 0 = Monday .. 6 = Sunday.
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".menu_schedules (
            id            UUID PRIMARY KEY DEFAULT public.uuid_generate_v4(),
            menu_id       UUID NOT NULL REFERENCES "{schema}".menus(id) ON DELETE CASCADE,
            start_time    VARCHAR(8) NOT NULL,
            end_time      VARCHAR(8) NOT NULL,
            days          SMALLINT[] NOT NULL,
            priority      INTEGER NOT NULL DEFAULT 0,
            timezone      VARCHAR(64) NOT NULL,
            is_active     BOOLEAN NOT NULL DEFAULT TRUE,
            allow_overlap BOOLEAN NOT NULL DEFAULT FALSE,
            start_date    DATE,
            end_date      DATE,
            badge         VARCHAR(64),
            created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    sqlx::raw_sql(&format!(
        r#"CREATE INDEX IF NOT EXISTS menu_schedules_menu_id_idx
           ON "{schema}".menu_schedules (menu_id)"#
    ))
    .execute(pool)
    .await?;

    // --- Audit log ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".audit_log (
            id             BIGSERIAL PRIMARY KEY,
            user_id        UUID,
            action         VARCHAR(64) NOT NULL,
            resource_type  VARCHAR(64),
            resource_id    VARCHAR(64),
            resource_label TEXT,
            created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- updated_at trigger function ---
    sqlx::raw_sql(&format!(
        r#"CREATE OR REPLACE FUNCTION "{schema}".update_updated_at()
           RETURNS TRIGGER AS $fn$
           BEGIN NEW.updated_at = NOW(); RETURN NEW; END;
           $fn$ LANGUAGE plpgsql"#
    ))
    .execute(pool)
    .await?;

    // --- Triggers (one per table, idempotent via DROP IF EXISTS + CREATE) ---
    for table in &["menus", "menu_schedules"] {
        let trigger = format!("{table}_updated_at");
        sqlx::raw_sql(&format!(
            r#"DROP TRIGGER IF EXISTS "{trigger}" ON "{schema}"."{table}";
               CREATE TRIGGER "{trigger}"
               BEFORE UPDATE ON "{schema}"."{table}"
               FOR EACH ROW EXECUTE FUNCTION "{schema}".update_updated_at()"#
        ))
        .execute(pool)
        .await?;
    }

    tracing::info!("Provisioned tenant schema: {schema}");
    Ok(())
}

/// Slugs of every active restaurant.
pub async fn active_slugs(pool: &PgPool) -> anyhow::Result<Vec<String>> {
    let slugs = sqlx::query_scalar(
        "SELECT slug FROM public.restaurants WHERE is_active = TRUE ORDER BY slug",
    )
    .fetch_all(pool)
    .await?;
    Ok(slugs)
}

/// Returns the PostgreSQL schema name for a given restaurant slug.
pub fn schema_name(slug: &str) -> String {
    format!("restaurant_{}", slug.to_lowercase().replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_name() {
        assert_eq!(schema_name("chez-lulu"), "restaurant_chez_lulu");
        assert_eq!(schema_name("Kandy-Grill-2"), "restaurant_kandy_grill_2");
    }
}
