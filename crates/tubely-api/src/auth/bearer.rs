use axum::http::{header::AUTHORIZATION, HeaderMap};
use tubely_core::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })?;

    if token.is_empty() {
        return Err(AppError::Unauthorized("Missing bearer token".to_string()));
    }
    Ok(token)
}
