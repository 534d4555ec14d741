use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, CounterVec, Gauge, GaugeVec,
};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db::tenant::{active_slugs, schema_name};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref RESOLUTIONS_COUNTER: CounterVec = register_counter_vec!(
        "menu_resolutions_total",
        "Availability resolutions by tenant and outcome (unrestricted, visible, hidden)",
        &["tenant", "outcome"]
    ).unwrap();

    pub static ref SKIPPED_SCHEDULES_COUNTER: CounterVec = register_counter_vec!(
        "menu_schedules_skipped_total",
        "Persisted schedules skipped during resolution because they failed validation",
        &["tenant", "code"]
    ).unwrap();

    pub static ref SCHEDULE_WRITES_COUNTER: CounterVec = register_counter_vec!(
        "menu_schedule_writes_total",
        "Schedule create/update/delete operations by tenant",
        &["tenant", "action"]
    ).unwrap();

    pub static ref VALIDATION_REJECTIONS_COUNTER: CounterVec = register_counter_vec!(
        "menu_schedule_rejections_total",
        "Schedule writes rejected by validation",
        &["tenant", "code"]
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref MENUS_GAUGE: GaugeVec = register_gauge_vec!(
        "restaurant_menus_active_total",
        "Active menus per tenant",
        &["tenant"]
    ).unwrap();

    pub static ref SCHEDULES_GAUGE: GaugeVec = register_gauge_vec!(
        "restaurant_schedules_active_total",
        "Active schedules per tenant",
        &["tenant"]
    ).unwrap();

    pub static ref TENANTS_GAUGE: Gauge = register_gauge!(
        "restaurant_tenants_active_total",
        "Number of active restaurants"
    ).unwrap();
}

/// Records the outcome of one availability resolution.
pub fn record_resolution(tenant: &str, unrestricted: bool, visible: bool) {
    let outcome = match (unrestricted, visible) {
        (true, _) => "unrestricted",
        (false, true) => "visible",
        (false, false) => "hidden",
    };
    RESOLUTIONS_COUNTER.with_label_values(&[tenant, outcome]).inc();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        // Initial collection on startup
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let tenants = active_slugs(pool).await?;

    TENANTS_GAUGE.set(tenants.len() as f64);

    for slug in &tenants {
        let schema = schema_name(slug);

        let menus: i64 = sqlx::query_scalar(&format!(
            r#"SELECT COUNT(*)::BIGINT FROM "{schema}".menus WHERE is_active = TRUE"#
        ))
        .fetch_one(pool)
        .await
        .unwrap_or(0);
        MENUS_GAUGE.with_label_values(&[slug.as_str()]).set(menus as f64);

        let schedules: i64 = sqlx::query_scalar(&format!(
            r#"SELECT COUNT(*)::BIGINT FROM "{schema}".menu_schedules WHERE is_active = TRUE"#
        ))
        .fetch_one(pool)
        .await
        .unwrap_or(0);
        SCHEDULES_GAUGE.with_label_values(&[slug.as_str()]).set(schedules as f64);
    }

    info!("Metrics: collected for {} tenant(s)", tenants.len());
    Ok(())
}
