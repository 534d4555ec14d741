pub mod availability;
pub mod health;
pub mod menus;
pub mod metrics;
pub mod schedules;
pub mod tenant_info;
pub mod tenants;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::models::schedule::ConfigurationError;

pub type ApiError = (StatusCode, Json<Value>);

/// Logs the underlying error and returns a 500.
pub(crate) fn internal_error(e: anyhow::Error) -> ApiError {
    tracing::error!("request failed: {e:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

pub(crate) fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({ "error": format!("{what} not found") })))
}

pub(crate) fn invalid_schedule(e: &ConfigurationError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": e.to_string(), "code": e.code() })),
    )
}
