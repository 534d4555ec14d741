use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A restaurant menu. Availability is governed by its schedules.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Menu {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for POST /menus.
#[derive(Debug, Deserialize)]
pub struct CreateMenuRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Query params for the availability endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    /// Instant to evaluate (RFC 3339). Defaults to the server clock.
    pub at: Option<DateTime<Utc>>,
}
