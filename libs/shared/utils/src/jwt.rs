use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use shared_models::auth::{JwtClaims, Role, User};

/// Signs an HS256 token carrying the account id and role.
pub fn issue_token(
    user_id: &str,
    role: Role,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let exp = now + Duration::hours(expiry_hours);

    let claims = JwtClaims {
        id: user_id.to_string(),
        role,
        iat: now.timestamp().max(0) as u64,
        exp: exp.timestamp().max(0) as u64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {}", e))
}

pub fn decode_claims(token: &str, jwt_secret: &str) -> Result<JwtClaims, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let validation = Validation::new(Algorithm::HS256);

    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => "Token expired".to_string(),
            ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                "Invalid token format".to_string()
            }
            _ => "Invalid token".to_string(),
        }
    })
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    let claims = decode_claims(token, jwt_secret)?;

    let user = User {
        id: claims.id,
        role: claims.role,
        issued_at: Utc.timestamp_opt(claims.iat as i64, 0).single(),
    };

    debug!("Token validated successfully for {} {}", user.role, user.id);
    Ok(user)
}
