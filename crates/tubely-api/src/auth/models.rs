use crate::auth::{get_bearer_token, validate_jwt};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;
use uuid::Uuid;

/// Caller identity established from the bearer token.
///
/// Extracted from the request parts, so it can sit before a `Multipart`
/// argument and rejects the request before any body byte is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = get_bearer_token(&parts.headers)?;
        let user_id = validate_jwt(token, &state.config.jwt_secret)?;
        Ok(AuthenticatedUser { user_id })
    }
}
