use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use super::schema::{ForgotPasswordRequest, ForgotPasswordResponse};
use super::service::ResetOutcome;
use crate::error::AppError;
use crate::AppState;

// =============================================================================
// POST /forgot-password
// =============================================================================

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let identifier = req
        .identifier
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| AppError::Validation("identifier is required".to_string()))?;
    let method = req.method.unwrap_or_default();

    match state.recovery.request_reset(&identifier, &method, Utc::now()).await {
        Ok(ResetOutcome::LinkSent { email }) => {
            state.metrics.record_password_reset("email", "success");
            Ok(Json(ForgotPasswordResponse {
                success: true,
                message: format!("Reset link sent to {}", email),
                password: None,
            }))
        }
        Ok(ResetOutcome::PasswordGenerated { password }) => {
            state.metrics.record_password_reset("generate", "success");
            Ok(Json(ForgotPasswordResponse {
                success: true,
                message: format!("New password: {}", password),
                password: Some(password),
            }))
        }
        Err(e) => {
            let label = match method.as_str() {
                "email" | "generate" => method.as_str(),
                _ => "invalid",
            };
            state.metrics.record_password_reset(label, e.outcome());
            tracing::warn!(method = label, "password reset refused: {}", e);
            Err(e.into())
        }
    }
}
