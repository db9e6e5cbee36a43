use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use super::service::QuotaUsage;
use crate::error::AppError;
use crate::modules::auth::AuthUser;
use crate::AppState;

// =============================================================================
// GET /tweet-limit
// =============================================================================

pub async fn tweet_limit(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<QuotaUsage>, AppError> {
    let user = state
        .users
        .find_by_email(&auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let usage = state.quota.remaining(&user, Utc::now()).await?;

    Ok(Json(usage))
}
