use axum::{extract::State, http::StatusCode, Json};
use chrono_tz::Tz;
use serde_json::{json, Value};

use super::{internal_error, ApiError};
use crate::{
    db::tenant::provision_tenant_schema,
    middleware::{super_admin::SuperAdminAuth, tenant::is_valid_slug},
    models::tenant::{CreateRestaurantRequest, Restaurant},
    AppState,
};

const RESERVED_SLUGS: &[&str] = &["www", "api", "app", "admin", "super-admin", "status", "docs"];

// ─── Restaurant registry ──────────────────────────────────────────────────────

/// GET /super-admin/restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
) -> Result<Json<Value>, ApiError> {
    let restaurants =
        sqlx::query_as::<_, Restaurant>("SELECT * FROM public.restaurants ORDER BY name")
            .fetch_all(&state.db)
            .await
            .map_err(|e| internal_error(e.into()))?;
    Ok(Json(json!(restaurants)))
}

/// POST /super-admin/restaurants: registers a restaurant and provisions its schema
pub async fn create_restaurant(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    Json(body): Json<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let slug = body.slug.trim().to_lowercase();
    if !is_valid_slug(&slug) || RESERVED_SLUGS.contains(&slug.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid or reserved slug" })),
        ));
    }

    let default_timezone = match body.default_timezone.as_deref() {
        Some(zone) => zone
            .parse::<Tz>()
            .map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("Unknown timezone '{zone}'") })),
                )
            })?
            .name()
            .to_string(),
        None => state.config.default_timezone.clone(),
    };

    let restaurant = sqlx::query_as::<_, Restaurant>(
        "INSERT INTO public.restaurants (slug, name, default_timezone)
         VALUES ($1, $2, $3)
         ON CONFLICT (slug) DO NOTHING
         RETURNING *",
    )
    .bind(&slug)
    .bind(body.name.trim())
    .bind(&default_timezone)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| internal_error(e.into()))?
    .ok_or_else(|| (StatusCode::CONFLICT, Json(json!({ "error": "Slug already taken" }))))?;

    provision_tenant_schema(&state.db, &slug)
        .await
        .map_err(|e| internal_error(e.context("schema provisioning failed")))?;

    tracing::info!(tenant = %slug, zone = %default_timezone, "restaurant registered");
    Ok((StatusCode::CREATED, Json(json!(restaurant))))
}
