use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;
use uuid::Uuid;

/// Issuer written into and required from every access token.
pub const TOKEN_ISSUER: &str = "tubely-access";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String, // user_id
    pub iat: i64,
    pub exp: i64,
}

/// Issue an HS256 access token for `user_id`.
pub fn make_jwt(user_id: Uuid, secret: &str, expires_in: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Validate an HS256 access token and return the user id it was issued for.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    let token_data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                AppError::Unauthorized("Invalid token issuer".to_string())
            }
            _ => AppError::Unauthorized(format!("Couldn't validate JWT: {}", e)),
        }
    })?;

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}
