use axum::{routing::post, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn recovery_routes() -> Router<Arc<AppState>> {
    Router::new().route("/forgot-password", post(controller::forgot_password))
}
