use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn post_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/post", post(controller::create_post).get(controller::list_posts))
        .route("/userpost", get(controller::user_posts))
        .route("/voice-tweet", post(controller::voice_tweet))
        .route("/api/chatbot", post(controller::chatbot))
}
