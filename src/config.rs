use std::env;

use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub super_admin_key: String,
    pub app_base_url: String,
    /// IANA zone given to restaurants registered without one.
    pub default_timezone: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            get(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Missing required env var: {}", key))
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.into());

        let default_timezone = or_default("DEFAULT_TIMEZONE", "UTC");
        let default_timezone = default_timezone
            .parse::<Tz>()
            .map_err(|_| {
                anyhow::anyhow!("DEFAULT_TIMEZONE is not an IANA zone: {}", default_timezone)
            })?
            .name()
            .to_string();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: or_default("DB_MAX_CONNECTIONS", "20").parse()?,
            jwt_secret: required("JWT_SECRET")?,
            host: or_default("HOST", "0.0.0.0"),
            port: or_default("PORT", "8080").parse()?,
            super_admin_key: or_default("SUPER_ADMIN_KEY", "change_this_super_admin_key"),
            app_base_url: or_default("APP_BASE_URL", "http://localhost"),
            default_timezone,
        })
    }
}
