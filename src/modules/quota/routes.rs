use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn quota_routes() -> Router<Arc<AppState>> {
    Router::new().route("/tweet-limit", get(controller::tweet_limit))
}
