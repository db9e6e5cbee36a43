use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::model::{NewPost, Post};
use super::schema::{ChatbotRequest, ChatbotResponse, CreatePostRequest, VoiceTweetRequest};
use super::service::{publish_with_quota, PublishOutcome};
use crate::error::AppError;
use crate::modules::auth::AuthUser;
use crate::modules::users::schema::EmailQuery;
use crate::AppState;

/// Topic search returns at most this many posts.
pub const CHATBOT_RESULT_LIMIT: u32 = 3;

// =============================================================================
// POST /post
// =============================================================================

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let user = state
        .users
        .find_by_email(&auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let draft = NewPost {
        body: req.post,
        photo: req.photo,
        audio: req.audio,
    };

    match publish_with_quota(&state.quota, state.posts.as_ref(), &user, draft, Utc::now()).await? {
        PublishOutcome::Published(post) => {
            state.metrics.record_quota_decision(user.subscription.as_str(), true);
            Ok((StatusCode::CREATED, Json(post)))
        }
        PublishOutcome::LimitExceeded { limit, used } => {
            state.metrics.record_quota_decision(user.subscription.as_str(), false);
            tracing::warn!(email = %user.email, tier = %user.subscription, used, limit, "post quota exceeded");
            Err(AppError::Conflict(format!(
                "Tweet limit reached for your plan ({} of {} used)",
                used, limit
            )))
        }
    }
}

// =============================================================================
// GET /post
// =============================================================================

pub async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.posts.list_all().await?))
}

// =============================================================================
// GET /userpost?email=
// =============================================================================

pub async fn user_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    let email = query
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Email required".to_string()))?;

    Ok(Json(state.posts.list_by_author(&email).await?))
}

// =============================================================================
// POST /voice-tweet
// =============================================================================

/// Voice uploads skip both authentication and the posting quota.
pub async fn voice_tweet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VoiceTweetRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let (Some(email), Some(audio_url)) = (
        req.email.filter(|e| !e.is_empty()),
        req.audio_url.filter(|a| !a.is_empty()),
    ) else {
        return Err(AppError::Validation("email and audio_url are required".to_string()));
    };

    let post = NewPost {
        body: req.post.unwrap_or_default(),
        photo: None,
        audio: Some(audio_url),
    }
    .into_post(&email, Utc::now());

    state.posts.create(&post).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

// =============================================================================
// POST /api/chatbot
// =============================================================================

pub async fn chatbot(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatbotRequest>,
) -> Result<Json<ChatbotResponse>, AppError> {
    let query = req
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Query is required.".to_string()))?;

    let tweets = state.posts.search(query.trim(), CHATBOT_RESULT_LIMIT).await?;

    let message = if tweets.is_empty() {
        "No tweets found for that topic."
    } else {
        "Tweets found!"
    };

    Ok(Json(ChatbotResponse { tweets, message }))
}
