use axum::Json;
use chrono::Utc;
use chrono_tz::Tz;
use serde_json::{json, Value};

use crate::middleware::tenant::Tenant;

/// GET /tenant/info: public restaurant details for the menu display.
pub async fn get_tenant_info(tenant: Tenant) -> Json<Value> {
    let local_time = tenant
        .default_timezone
        .parse::<Tz>()
        .map(|tz| Utc::now().with_timezone(&tz).to_rfc3339())
        .ok();

    Json(json!({
        "slug": tenant.slug,
        "name": tenant.name,
        "default_timezone": tenant.default_timezone,
        "local_time": local_time,
    }))
}
