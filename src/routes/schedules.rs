use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{internal_error, invalid_schedule, not_found, ApiError};
use crate::{
    middleware::{
        auth::{require_editor, require_member},
        tenant::Tenant,
    },
    models::{
        auth::AuthenticatedUser,
        schedule::{ConfigurationError, CreateScheduleRequest, UpdateScheduleRequest},
    },
    services::{
        audit::{self, AuditAction, AuditEntry},
        availability::{compile, find_conflicts},
        menus::MenuService,
        metrics::{SCHEDULE_WRITES_COUNTER, VALIDATION_REJECTIONS_COUNTER},
        schedules::ScheduleService,
    },
    AppState,
};

async fn ensure_menu(state: &AppState, tenant: &str, menu_id: Uuid) -> Result<(), ApiError> {
    match MenuService::find(&state.db, tenant, menu_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found("Menu")),
        Err(e) => Err(internal_error(e)),
    }
}

fn reject(tenant: &str, e: ConfigurationError) -> ApiError {
    VALIDATION_REJECTIONS_COUNTER
        .with_label_values(&[tenant, e.code()])
        .inc();
    tracing::info!(tenant, code = e.code(), "schedule rejected: {e}");
    invalid_schedule(&e)
}

/// GET /menus/{menu_id}/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    tenant: Tenant,
    user: AuthenticatedUser,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_member(&user, &tenant.slug)?;
    ensure_menu(&state, &tenant.slug, menu_id).await?;
    let schedules = ScheduleService::list_for_menu(&state.db, &tenant.slug, menu_id)
        .await
        .map_err(internal_error)?;
    Ok(Json(json!(schedules)))
}

/// POST /menus/{menu_id}/schedules: owners and managers only
pub async fn create_schedule(
    State(state): State<AppState>,
    tenant: Tenant,
    user: AuthenticatedUser,
    Path(menu_id): Path<Uuid>,
    Json(body): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_editor(&user, &tenant.slug)?;
    ensure_menu(&state, &tenant.slug, menu_id).await?;

    let draft = body
        .validate(&tenant.default_timezone)
        .map_err(|e| reject(&tenant.slug, e))?;

    let schedule = ScheduleService::create(&state.db, &tenant.slug, menu_id, &draft)
        .await
        .map_err(internal_error)?;

    SCHEDULE_WRITES_COUNTER
        .with_label_values(&[tenant.slug.as_str(), "create"])
        .inc();
    audit::log(
        state.db.clone(),
        &tenant.slug,
        AuditEntry {
            user_id: Some(user.user_id),
            action: AuditAction::ScheduleCreated,
            resource_id: schedule.id,
            resource_label: schedule.badge.clone(),
        },
    );
    tracing::info!(tenant = %tenant.slug, %menu_id, schedule_id = %schedule.id, "schedule created");

    Ok((StatusCode::CREATED, Json(json!(schedule))))
}

/// PUT /schedules/{id}: owners and managers only
pub async fn update_schedule(
    State(state): State<AppState>,
    tenant: Tenant,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateScheduleRequest>,
) -> Result<Json<Value>, ApiError> {
    require_editor(&user, &tenant.slug)?;

    let existing = ScheduleService::find(&state.db, &tenant.slug, id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Schedule"))?;

    let draft = body
        .merge_into(&existing)
        .map_err(|e| reject(&tenant.slug, e))?;

    let schedule = ScheduleService::update(&state.db, &tenant.slug, id, &draft)
        .await
        .map_err(internal_error)?;

    SCHEDULE_WRITES_COUNTER
        .with_label_values(&[tenant.slug.as_str(), "update"])
        .inc();
    audit::log(
        state.db.clone(),
        &tenant.slug,
        AuditEntry {
            user_id: Some(user.user_id),
            action: AuditAction::ScheduleUpdated,
            resource_id: id,
            resource_label: schedule.badge.clone(),
        },
    );
    tracing::info!(tenant = %tenant.slug, schedule_id = %id, "schedule updated");

    Ok(Json(json!(schedule)))
}

/// DELETE /schedules/{id}: owners and managers only
pub async fn delete_schedule(
    State(state): State<AppState>,
    tenant: Tenant,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_editor(&user, &tenant.slug)?;

    let deleted = ScheduleService::delete(&state.db, &tenant.slug, id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err(not_found("Schedule"));
    }

    SCHEDULE_WRITES_COUNTER
        .with_label_values(&[tenant.slug.as_str(), "delete"])
        .inc();
    audit::log(
        state.db.clone(),
        &tenant.slug,
        AuditEntry {
            user_id: Some(user.user_id),
            action: AuditAction::ScheduleDeleted,
            resource_id: id,
            resource_label: None,
        },
    );
    tracing::info!(tenant = %tenant.slug, schedule_id = %id, "schedule deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /menus/{menu_id}/schedules/conflicts: equal-priority exclusive schedules that overlap
pub async fn list_conflicts(
    State(state): State<AppState>,
    tenant: Tenant,
    user: AuthenticatedUser,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_member(&user, &tenant.slug)?;
    ensure_menu(&state, &tenant.slug, menu_id).await?;
    let schedules = ScheduleService::list_for_menu(&state.db, &tenant.slug, menu_id)
        .await
        .map_err(internal_error)?;

    let (rules, skipped) = compile(&schedules);
    Ok(Json(json!({
        "menu_id": menu_id,
        "conflicts": find_conflicts(&rules),
        "skipped": skipped,
    })))
}
