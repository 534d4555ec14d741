use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{internal_error, not_found, ApiError};
use crate::{
    middleware::{auth::require_editor, tenant::Tenant},
    models::{auth::AuthenticatedUser, menu::CreateMenuRequest},
    services::{
        audit::{self, AuditAction, AuditEntry},
        menus::MenuService,
    },
    AppState,
};

/// GET /menus: public, used by the customer-facing menu display
pub async fn list_menus(
    State(state): State<AppState>,
    tenant: Tenant,
) -> Result<Json<Value>, ApiError> {
    let menus = MenuService::list(&state.db, &tenant.slug)
        .await
        .map_err(internal_error)?;
    Ok(Json(json!(menus)))
}

/// POST /menus: owners and managers only
pub async fn create_menu(
    State(state): State<AppState>,
    tenant: Tenant,
    user: AuthenticatedUser,
    Json(body): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_editor(&user, &tenant.slug)?;

    if body.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "Menu name is required" }))));
    }

    let menu = MenuService::create(&state.db, &tenant.slug, &body)
        .await
        .map_err(internal_error)?;

    audit::log(
        state.db.clone(),
        &tenant.slug,
        AuditEntry {
            user_id: Some(user.user_id),
            action: AuditAction::MenuCreated,
            resource_id: menu.id,
            resource_label: Some(menu.name.clone()),
        },
    );
    tracing::info!(tenant = %tenant.slug, menu_id = %menu.id, "menu created");

    Ok((StatusCode::CREATED, Json(json!(menu))))
}

/// DELETE /menus/{id}: owners and managers only; schedules go with it
pub async fn delete_menu(
    State(state): State<AppState>,
    tenant: Tenant,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_editor(&user, &tenant.slug)?;

    let deleted = MenuService::delete(&state.db, &tenant.slug, id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err(not_found("Menu"));
    }

    audit::log(
        state.db.clone(),
        &tenant.slug,
        AuditEntry {
            user_id: Some(user.user_id),
            action: AuditAction::MenuDeleted,
            resource_id: id,
            resource_label: None,
        },
    );
    tracing::info!(tenant = %tenant.slug, menu_id = %id, "menu deleted");

    Ok(StatusCode::NO_CONTENT)
}
