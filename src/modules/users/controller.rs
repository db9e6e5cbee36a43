use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use super::model::{is_supported_language, ProfileUpdate, User, DEFAULT_LANGUAGE};
use super::schema::{EmailQuery, RegisterRequest, UpdateProfileRequest, UserResponse};
use crate::error::AppError;
use crate::AppState;

// =============================================================================
// POST /register
// =============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let language = req.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    if !is_supported_language(&language) {
        return Err(AppError::Validation(format!("Unsupported language: {}", language)));
    }

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    if let Some(username) = &req.username {
        if state.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
    }

    let mut user = User::new(req.email, Utc::now());
    user.name = req.name;
    user.username = req.username;
    user.phone = req.phone;
    user.preferred_language = language;

    if let Err(e) = state.users.create(&user).await {
        if e.is_unique_violation() {
            return Err(AppError::Conflict("Email or username already exists".to_string()));
        }
        return Err(e.into());
    }

    tracing::info!(email = %user.email, "user registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

// =============================================================================
// GET /loggedinuser?email=
// =============================================================================

pub async fn logged_in_user(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<UserResponse>, AppError> {
    let email = query
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Email required".to_string()))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

// =============================================================================
// GET /user
// =============================================================================

pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// =============================================================================
// PATCH /userupdate/{email}
// =============================================================================

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(username) = &req.username {
        if let Some(owner) = state.users.find_by_username(username).await? {
            if owner.email != email {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
        }
    }

    let update = ProfileUpdate {
        name: req.name,
        username: req.username,
        phone: req.phone,
        bio: req.bio,
        profile_photo: req.profile_photo,
    };

    // The pre-check above can lose a race with a concurrent update.
    match state.users.update_profile(&email, &update).await {
        Ok(true) => {}
        Ok(false) => return Err(AppError::NotFound("User not found".to_string())),
        Err(e) if e.is_unique_violation() => {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
