use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant in the public registry. Each restaurant owns one PostgreSQL schema.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    /// IANA zone used when a schedule is created without one, and as the
    /// reference zone for displaying evaluation times.
    pub default_timezone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub slug: String,
    pub name: String,
    pub default_timezone: Option<String>,
}
