use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use uuid::Uuid;

use super::{internal_error, not_found, ApiError};
use crate::{
    middleware::tenant::Tenant,
    models::{menu::AvailabilityQuery, schedule::MenuSchedule},
    services::{
        availability::{next_transition, resolve, ResolvedSchedule, SkippedSchedule},
        menus::MenuService,
        metrics::{record_resolution, SKIPPED_SCHEDULES_COUNTER},
        schedules::ScheduleService,
    },
    AppState,
};

/// Availability of one menu at one instant.
#[derive(Debug, Serialize)]
pub struct MenuAvailability {
    pub menu_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    /// `evaluated_at` in the restaurant's reference timezone.
    pub local_time: String,
    pub visible: bool,
    pub unrestricted: bool,
    pub in_effect: Vec<ResolvedSchedule>,
    pub skipped: Vec<SkippedSchedule>,
    pub next_change_at: Option<DateTime<Utc>>,
}

fn reference_zone(tenant: &Tenant) -> Tz {
    tenant.default_timezone.parse().unwrap_or_else(|_| {
        tracing::warn!(
            tenant = %tenant.slug,
            zone = %tenant.default_timezone,
            "invalid default timezone, using UTC"
        );
        Tz::UTC
    })
}

/// Resolves a menu's schedules and records metrics and warnings for the outcome.
fn evaluate(
    tenant: &Tenant,
    menu_id: Uuid,
    schedules: &[MenuSchedule],
    at: DateTime<Utc>,
) -> MenuAvailability {
    let resolution = resolve(schedules, at);

    for skipped in &resolution.skipped {
        SKIPPED_SCHEDULES_COUNTER
            .with_label_values(&[tenant.slug.as_str(), skipped.code])
            .inc();
        tracing::warn!(
            tenant = %tenant.slug,
            %menu_id,
            schedule_id = %skipped.id,
            "skipping malformed schedule: {}",
            skipped.reason
        );
    }
    record_resolution(&tenant.slug, resolution.unrestricted, resolution.is_visible());

    MenuAvailability {
        menu_id,
        evaluated_at: at,
        local_time: at.with_timezone(&reference_zone(tenant)).to_rfc3339(),
        visible: resolution.is_visible(),
        unrestricted: resolution.unrestricted,
        next_change_at: next_transition(schedules, at),
        in_effect: resolution.in_effect,
        skipped: resolution.skipped,
    }
}

/// GET /menus/{menu_id}/availability?at=RFC3339: public
pub async fn menu_availability(
    State(state): State<AppState>,
    tenant: Tenant,
    Path(menu_id): Path<Uuid>,
    Query(params): Query<AvailabilityQuery>,
) -> Result<Json<MenuAvailability>, ApiError> {
    let at = params.at.unwrap_or_else(Utc::now);

    MenuService::find(&state.db, &tenant.slug, menu_id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Menu"))?;

    let schedules = ScheduleService::list_for_menu(&state.db, &tenant.slug, menu_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(evaluate(&tenant, menu_id, &schedules, at)))
}

/// GET /availability?at=RFC3339: every active menu, visible ones first
pub async fn all_availability(
    State(state): State<AppState>,
    tenant: Tenant,
    Query(params): Query<AvailabilityQuery>,
) -> Result<Json<Vec<MenuAvailability>>, ApiError> {
    let at = params.at.unwrap_or_else(Utc::now);

    let menus = MenuService::list_active(&state.db, &tenant.slug)
        .await
        .map_err(internal_error)?;
    let schedules = ScheduleService::list_all(&state.db, &tenant.slug)
        .await
        .map_err(internal_error)?;

    let mut out: Vec<MenuAvailability> = menus
        .iter()
        .map(|menu| {
            let own: Vec<MenuSchedule> = schedules
                .iter()
                .filter(|s| s.menu_id == menu.id)
                .cloned()
                .collect();
            evaluate(&tenant, menu.id, &own, at)
        })
        .collect();
    // Stable sort keeps the menus' name order within each group.
    out.sort_by_key(|a| !a.visible);

    Ok(Json(out))
}
