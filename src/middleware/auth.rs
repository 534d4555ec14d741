use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};

use crate::models::auth::{AuthenticatedUser, Claims};

/// Bearer tokens are issued by the account service; this API only verifies them.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid Authorization header format"))?;

        let secret = parts
            .extensions
            .get::<JwtSecret>()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "JWT secret not configured"))?;

        let user = decode_access_token(token, &secret.0)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        // Cross-tenant IDOR prevention: the token's restaurant must match the requested one.
        if let Some(x_tenant) = parts
            .headers
            .get("X-Tenant")
            .and_then(|v| v.to_str().ok())
        {
            if user.tenant != x_tenant.to_lowercase() {
                return Err((StatusCode::FORBIDDEN, "Tenant mismatch"));
            }
        }

        Ok(user)
    }
}

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthenticatedUser, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    let claims = data.claims;

    Ok(AuthenticatedUser {
        user_id: claims.sub.parse()?,
        tenant: claims.tenant,
        role: claims.role,
    })
}

/// Rejects tokens issued for another restaurant than the one being accessed.
///
/// The extractor only sees `X-Tenant`; a tenant resolved from the subdomain is
/// checked here.
pub fn require_member(
    user: &AuthenticatedUser,
    tenant: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    if user.tenant != tenant {
        return Err((StatusCode::FORBIDDEN, Json(json!({ "error": "Tenant mismatch" }))));
    }
    Ok(())
}

/// Rejects users who may not edit menus, or whose token belongs to another restaurant.
pub fn require_editor(
    user: &AuthenticatedUser,
    tenant: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    require_member(user, tenant)?;
    if !user.role.can_edit_menus() {
        return Err((StatusCode::FORBIDDEN, Json(json!({ "error": "Access denied" }))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::StaffRole;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn token(role: StaffRole, exp_offset_secs: i64) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            tenant: "chez-lulu".into(),
            role,
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
        };
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let token = encode(&Header::default(), &claims, &key).unwrap();
        (user_id, token)
    }

    #[test]
    fn test_decode_valid_token() {
        let (user_id, jwt) = token(StaffRole::Manager, 900);
        let user = decode_access_token(&jwt, SECRET).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.tenant, "chez-lulu");
        assert_eq!(user.role, StaffRole::Manager);
    }

    #[test]
    fn test_decode_rejects_wrong_secret_and_expired() {
        let (_, valid) = token(StaffRole::Owner, 900);
        assert!(decode_access_token(&valid, "other-secret").is_err());

        // Well past the default 60s leeway.
        let (_, expired) = token(StaffRole::Owner, -3600);
        assert!(decode_access_token(&expired, SECRET).is_err());
    }

    #[test]
    fn test_require_editor() {
        let user = AuthenticatedUser {
            user_id: Uuid::nil(),
            tenant: "chez-lulu".into(),
            role: StaffRole::Staff,
        };
        assert_eq!(require_editor(&user, "chez-lulu").unwrap_err().0, StatusCode::FORBIDDEN);

        let owner = AuthenticatedUser { role: StaffRole::Owner, ..user };
        assert!(require_editor(&owner, "chez-lulu").is_ok());
        assert!(require_editor(&owner, "kandy-grill").is_err());
    }

    #[test]
    fn test_require_member_rejects_other_restaurant() {
        // Any role, even read-only staff, may read its own restaurant.
        let staff = AuthenticatedUser {
            user_id: Uuid::nil(),
            tenant: "chez-lulu".into(),
            role: StaffRole::Staff,
        };
        assert!(require_member(&staff, "chez-lulu").is_ok());

        let (status, body) = require_member(&staff, "kandy-grill").unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.0["error"], "Tenant mismatch");
    }
}
