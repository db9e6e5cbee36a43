use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::error::AppError;
use crate::AppState;

/// Caller whose bearer credential the identity authority accepted.
///
/// ```ignore
/// async fn handler(user: AuthUser) { /* user.email is verified */ }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: String,
    pub email: String,
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthenticated("Missing or invalid token".to_string()))?;

        let identity = state.identity.verify_token(token).await.map_err(|e| {
            tracing::debug!("bearer token rejected: {}", e);
            AppError::Unauthenticated("Unauthorized".to_string())
        })?;

        Ok(AuthUser {
            account_id: identity.account_id,
            email: identity.email,
        })
    }
}
